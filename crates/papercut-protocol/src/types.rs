//! Value types for the XML-RPC envelope.

use std::fmt;

/// Fixed namespace prefix prepended to every method name on the wire.
pub const API_NAMESPACE: &str = "api.";

/// A single call argument.
///
/// The server API only ever receives strings, floating-point numbers and
/// booleans from this client; richer XML-RPC types (structs, arrays, dates)
/// are deliberately unrepresentable so an unsupported shape cannot reach
/// the encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcArg {
    /// Encoded as `<string>`, with XML special characters escaped.
    Text(String),
    /// Encoded as `<double>` in canonical decimal form. Must be finite:
    /// NaN and infinities have no XML-RPC representation and are rejected
    /// by the encoder.
    Number(f64),
    /// Encoded as `<boolean>`, `1` for true and `0` for false.
    Bool(bool),
}

impl From<&str> for RpcArg {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RpcArg {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for RpcArg {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for RpcArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A decoded response value.
///
/// The server only ever returns string scalars or flat arrays of strings
/// to this client. Responses carrying any other shape decode to an error,
/// never to one of these variants.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcValue {
    /// The response carried no value element at all.
    Empty,
    /// A single string scalar.
    Text(String),
    /// A flat array of strings, in document order.
    List(Vec<String>),
}

impl RpcValue {
    /// Short name of this value's shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Text(_) => "string",
            Self::List(_) => "array",
        }
    }

    /// Returns the scalar text, if this is a [`RpcValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Consumes the value and returns the list, if this is a [`RpcValue::List`].
    pub fn into_list(self) -> Option<Vec<String>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

/// A well-formed protocol-level rejection from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Human-readable message from the `faultString` member.
    pub message: String,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The decoded contents of a `methodResponse` document.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The call succeeded and returned this value.
    Value(RpcValue),
    /// The server rejected the call.
    Fault(Fault),
}
