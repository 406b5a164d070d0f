//! Codec error types.

use thiserror::Error;

/// Result type for decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors produced while decoding a `methodResponse` document.
///
/// These are distinct from protocol faults: a fault is a well-formed
/// rejection from the server, while a `DecodeError` means the body could
/// not be understood at all.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body was not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The body parsed as XML but is not a `methodResponse` document.
    #[error("not a methodResponse document")]
    NotAResponse,

    /// The response value uses an XML-RPC type this client does not speak.
    #[error("unsupported response shape: {kind}")]
    UnsupportedShape {
        /// The offending value's type tag (e.g. `struct`, `int`).
        kind: String,
    },

    /// A fault response whose struct has no `faultString` member.
    #[error("fault response missing faultString member")]
    MalformedFault,

    /// A well-formed value of the wrong shape for the operation.
    #[error("unexpected response value: expected {expected}, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },
}
