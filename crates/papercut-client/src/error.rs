//! Client error types.

use papercut_protocol::DecodeError;
use thiserror::Error;

/// Result type for client operations.
pub type CallResult<T> = Result<T, CallError>;

/// Errors surfaced by [`crate::RpcClient::call`] and the typed API.
///
/// The three classes matter to callers for different reasons: a transport
/// error may be worth retrying at the caller's discretion (the client
/// itself never retries), a fault means the server understood the call and
/// said no, and a decode error means we could not understand the server.
#[derive(Debug, Error)]
pub enum CallError {
    /// Network failure or response-body read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("server returned HTTP {status}")]
    Status {
        status: reqwest::StatusCode,
    },

    /// Well-formed rejection from the server, carrying the verbatim
    /// `faultString` message.
    #[error("server fault: {0}")]
    Fault(String),

    /// The response body could not be understood.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl CallError {
    /// Returns true if the server rejected the call at the protocol level.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    /// Returns the fault message, if this is a protocol fault.
    pub fn fault_message(&self) -> Option<&str> {
        match self {
            Self::Fault(message) => Some(message),
            _ => None,
        }
    }
}
