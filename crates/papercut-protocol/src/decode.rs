//! Response envelope decoding.
//!
//! The server only ever returns three shapes to this client: no value at
//! all, a single `<string>` scalar, or a flat `<array>` of strings. Fault
//! responses carry a struct whose `faultString` member is located by name,
//! not by position. Every other shape decodes to an explicit error so a
//! misunderstood response can never masquerade as an empty result.

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::{DecodeError, DecodeResult};
use crate::types::{Fault, Response, RpcValue};

const PARAM: [&str; 3] = ["methodResponse", "params", "param"];
const PARAM_VALUE: [&str; 4] = ["methodResponse", "params", "param", "value"];
const SCALAR_TEXT: [&str; 5] = ["methodResponse", "params", "param", "value", "string"];
const ARRAY_DATA: [&str; 6] = ["methodResponse", "params", "param", "value", "array", "data"];
const ARRAY_ITEM_TEXT: [&str; 8] = [
    "methodResponse",
    "params",
    "param",
    "value",
    "array",
    "data",
    "value",
    "string",
];
const FAULT_STRUCT: [&str; 4] = ["methodResponse", "fault", "value", "struct"];
const FAULT_MEMBER: [&str; 5] = ["methodResponse", "fault", "value", "struct", "member"];
const FAULT_MEMBER_NAME: [&str; 6] = [
    "methodResponse",
    "fault",
    "value",
    "struct",
    "member",
    "name",
];

/// Decodes a `methodResponse` document into a value or a fault.
///
/// Returns [`DecodeError`] when the body is not well-formed XML, is not a
/// `methodResponse` at all, or carries a value shape this client does not
/// support. A well-formed fault is not an error at this layer; it comes
/// back as [`Response::Fault`].
pub fn decode_response(xml: &str) -> DecodeResult<Response> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut scanner = Scanner::default();
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                scanner.open(&path, &name)?;
                path.push(name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                scanner.open(&path, &name)?;
                scanner.close(&path, &name);
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(quick_xml::Error::from)?;
                scanner.text(&path, &text)?;
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).to_string();
                scanner.text(&path, &text)?;
            }
            Event::End(_) => {
                if let Some(name) = path.pop() {
                    scanner.close(&path, &name);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    scanner.finish()
}

/// Shape of the single response value, fixed by its first child element.
enum ValueKind {
    Scalar,
    Array,
}

/// Streaming state for one pass over the response document.
#[derive(Default)]
struct Scanner {
    saw_response: bool,
    saw_fault: bool,
    /// A `param > value` element was opened, even if it turned out to
    /// have no usable child. Distinguishes an unrecognized value from a
    /// response with no value element at all.
    saw_value: bool,
    /// Name of the fault-struct member currently being scanned.
    member_name: Option<String>,
    /// Set while inside the `faultString` member's value.
    collecting_fault: bool,
    fault_text: String,
    fault_string: Option<String>,
    value_kind: Option<ValueKind>,
    scalar: String,
    items: Vec<String>,
    /// Text of the array slot currently being scanned. `Some("")` until a
    /// string child contributes text, so slots without one survive as `""`.
    item: Option<String>,
}

impl Scanner {
    fn open(&mut self, path: &[String], name: &str) -> DecodeResult<()> {
        if path.is_empty() {
            if name != "methodResponse" {
                return Err(DecodeError::NotAResponse);
            }
            self.saw_response = true;
            return Ok(());
        }

        if name == "fault" && path.len() == 1 {
            self.saw_fault = true;
        } else if name == "value" && path_is(path, &PARAM) {
            self.saw_value = true;
        } else if path_is(path, &PARAM_VALUE) {
            if self.value_kind.is_none() {
                self.value_kind = Some(match name {
                    "string" => ValueKind::Scalar,
                    "array" => ValueKind::Array,
                    other => {
                        return Err(DecodeError::UnsupportedShape {
                            kind: other.to_string(),
                        });
                    }
                });
            }
        } else if name == "value" && path_is(path, &ARRAY_DATA) {
            self.item = Some(String::new());
        } else if name == "value"
            && path_is(path, &FAULT_MEMBER)
            && self.member_name.as_deref() == Some("faultString")
        {
            self.collecting_fault = true;
            self.fault_text.clear();
        }

        Ok(())
    }

    fn text(&mut self, path: &[String], text: &str) -> DecodeResult<()> {
        if self.collecting_fault {
            self.fault_text.push_str(text);
        } else if path_is(path, &FAULT_MEMBER_NAME) {
            self.member_name = Some(text.to_string());
        } else if path_is(path, &SCALAR_TEXT) {
            self.scalar.push_str(text);
        } else if path_is(path, &ARRAY_ITEM_TEXT) {
            if let Some(item) = self.item.as_mut() {
                item.push_str(text);
            }
        } else if path_is(path, &PARAM_VALUE)
            && self.value_kind.is_none()
            && !text.trim().is_empty()
        {
            // Bare <value>text</value> without a type tag. XML-RPC defaults
            // this to string, but the server never sends it; reject rather
            // than guess.
            return Err(DecodeError::UnsupportedShape {
                kind: "untyped value".to_string(),
            });
        }
        Ok(())
    }

    /// Called after an element closes; `parent` is the path above it.
    fn close(&mut self, parent: &[String], name: &str) {
        if name == "value" && path_is(parent, &ARRAY_DATA) {
            self.items.push(self.item.take().unwrap_or_default());
        } else if name == "value" && self.collecting_fault && path_is(parent, &FAULT_MEMBER) {
            self.fault_string = Some(std::mem::take(&mut self.fault_text));
            self.collecting_fault = false;
        } else if name == "member" && path_is(parent, &FAULT_STRUCT) {
            self.member_name = None;
        }
    }

    fn finish(self) -> DecodeResult<Response> {
        if !self.saw_response {
            return Err(DecodeError::NotAResponse);
        }

        if self.saw_fault {
            return match self.fault_string {
                Some(message) => Ok(Response::Fault(Fault { message })),
                None => Err(DecodeError::MalformedFault),
            };
        }

        let value = match self.value_kind {
            Some(ValueKind::Scalar) => RpcValue::Text(self.scalar),
            Some(ValueKind::Array) => RpcValue::List(self.items),
            // A value element with no usable child is unrecognized, not
            // empty; Empty is reserved for a response with no value at all.
            None if self.saw_value => {
                return Err(DecodeError::UnsupportedShape {
                    kind: "empty value".to_string(),
                });
            }
            None => RpcValue::Empty,
        };
        Ok(Response::Value(value))
    }
}

fn path_is(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(have, want)| have == want)
}
