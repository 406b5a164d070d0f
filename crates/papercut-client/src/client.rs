//! HTTP transport for XML-RPC calls.

use papercut_protocol::{Response, RpcArg, RpcValue, decode_response, encode_request};
use reqwest::Client;
use tracing::{debug, trace, warn};

use crate::config::EndpointConfig;
use crate::error::{CallError, CallResult};

/// Stateless XML-RPC transport.
///
/// Wraps a shared `reqwest::Client` so connections can be reused, but
/// carries no endpoint or credential state of its own; every call takes an
/// [`EndpointConfig`]. Calls are independent and may run concurrently.
/// Dropping a call's future aborts the pending exchange.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: Client,
}

impl RpcClient {
    /// Creates a new client with default HTTP settings.
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    /// Invokes one remote method: encode, POST, decode.
    ///
    /// Issues exactly one outbound request per invocation; no retries, no
    /// redirect special-casing, no caching. The three failure classes are
    /// kept distinct: [`CallError::Transport`] / [`CallError::Status`] for
    /// HTTP-level failure, [`CallError::Fault`] for a well-formed server
    /// rejection, and [`CallError::Decode`] for a body we could not
    /// understand.
    pub async fn call(
        &self,
        config: &EndpointConfig,
        method: &str,
        args: &[RpcArg],
    ) -> CallResult<RpcValue> {
        let body = encode_request(method, &config.auth_token, args);
        trace!(method, bytes = body.len(), "sending XML-RPC request");

        let mut request = self
            .http
            .post(config.url.clone())
            .header("Content-Type", "text/xml")
            .header("User-Agent", &config.user_agent)
            .body(body);
        if let Some(timeout) = config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(method, %status, "endpoint returned non-success status");
            return Err(CallError::Status { status });
        }

        let text = response.text().await?;
        trace!(method, bytes = text.len(), "received XML-RPC response");

        match decode_response(&text)? {
            Response::Value(value) => {
                debug!(method, kind = value.kind(), "call completed");
                Ok(value)
            }
            Response::Fault(fault) => {
                debug!(method, fault = %fault.message, "server rejected call");
                Err(CallError::Fault(fault.message))
            }
        }
    }
}

impl Default for RpcClient {
    fn default() -> Self {
        Self::new()
    }
}
