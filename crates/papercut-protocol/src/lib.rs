//! XML-RPC envelope codec for the PaperCut server API.
//!
//! This crate handles the wire format only: it turns a method name plus a
//! typed argument list into a `methodCall` document, and a `methodResponse`
//! document back into a value or a fault. It performs no I/O; the transport
//! lives in `papercut-client`.
//!
//! # Wire format
//!
//! Requests are XML-RPC `methodCall` documents. The method name on the wire
//! is the logical name prefixed with [`API_NAMESPACE`], and the auth token
//! always travels as the first `<string>` parameter:
//!
//! ```text
//! <?xml version="1.0"?>
//! <methodCall>
//!   <methodName>api.listUserAccounts</methodName>
//!   <params>
//!     <param><value><string>TOKEN</string></value></param>
//!     <param><value><double>0</double></value></param>
//!     <param><value><double>1000</double></value></param>
//!   </params>
//! </methodCall>
//! ```
//!
//! Responses carry either a single value (a string scalar or a flat array
//! of strings) or a `fault` struct. Any other value shape is surfaced as a
//! [`DecodeError::UnsupportedShape`] rather than silently misparsed.
//!
//! # Example
//!
//! ```rust
//! use papercut_protocol::{encode_request, decode_response, Response, RpcArg, RpcValue};
//!
//! let body = encode_request("getServerVersion", "token", &[]);
//! assert!(body.contains("<methodName>api.getServerVersion</methodName>"));
//!
//! let xml = "<methodResponse><params><param>\
//!            <value><string>3.1.5</string></value>\
//!            </param></params></methodResponse>";
//! let decoded = decode_response(xml).unwrap();
//! assert_eq!(decoded, Response::Value(RpcValue::Text("3.1.5".into())));
//! ```

mod decode;
mod encode;
mod error;
mod types;

pub use decode::decode_response;
pub use encode::encode_request;
pub use error::{DecodeError, DecodeResult};
pub use types::{API_NAMESPACE, Fault, Response, RpcArg, RpcValue};
