//! Request envelope encoding.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::types::{API_NAMESPACE, RpcArg};

/// Builds a complete `methodCall` document for one remote invocation.
///
/// The method name on the wire is [`API_NAMESPACE`] followed by `method`.
/// The auth token always travels as the first `<string>` parameter, then
/// one parameter per element of `args` in order. Text arguments are
/// XML-escaped by the writer; unescaped caller input never reaches the
/// envelope. Number arguments must be finite (see [`RpcArg::Number`]).
pub fn encode_request(method: &str, auth_token: &str, args: &[RpcArg]) -> String {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .unwrap();

    writer
        .write_event(Event::Start(BytesStart::new("methodCall")))
        .unwrap();

    let full_name = format!("{API_NAMESPACE}{method}");
    write_text_element(&mut writer, "methodName", &full_name);

    writer
        .write_event(Event::Start(BytesStart::new("params")))
        .unwrap();

    // Token first, as the server expects.
    write_param(&mut writer, "string", auth_token);

    for arg in args {
        match arg {
            RpcArg::Text(text) => write_param(&mut writer, "string", text),
            RpcArg::Number(number) => {
                debug_assert!(number.is_finite(), "XML-RPC double must be finite");
                write_param(&mut writer, "double", &number.to_string());
            }
            RpcArg::Bool(flag) => write_param(&mut writer, "boolean", if *flag { "1" } else { "0" }),
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new("params")))
        .unwrap();

    writer
        .write_event(Event::End(BytesEnd::new("methodCall")))
        .unwrap();

    let result = writer.into_inner().into_inner();
    String::from_utf8(result).unwrap()
}

/// Writes one `<param><value><TAG>text</TAG></value></param>` block.
fn write_param(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, text: &str) {
    writer
        .write_event(Event::Start(BytesStart::new("param")))
        .unwrap();
    writer
        .write_event(Event::Start(BytesStart::new("value")))
        .unwrap();

    write_text_element(writer, tag, text);

    writer
        .write_event(Event::End(BytesEnd::new("value")))
        .unwrap();
    writer
        .write_event(Event::End(BytesEnd::new("param")))
        .unwrap();
}

/// Writes `<name>text</name>`, escaping the text content.
fn write_text_element(writer: &mut Writer<Cursor<Vec<u8>>>, name: &str, text: &str) {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .unwrap();
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .unwrap();
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .unwrap();
}
