//! Endpoint configuration.

use std::time::Duration;

use url::Url;

/// Where and how to reach the server's XML-RPC endpoint.
///
/// Built fresh by the caller and passed by reference into every call; the
/// client itself holds no endpoint or credential state. The URL and token
/// are opaque here beyond URL syntax, and nothing is persisted.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Full endpoint URL, e.g. `https://host:9192/rpc/api/xmlrpc`.
    pub url: Url,

    /// Shared auth token, sent as the first parameter of every call.
    pub auth_token: String,

    /// Optional deadline for the whole request/response exchange.
    /// `None` means no client-imposed timeout.
    pub timeout: Option<Duration>,

    /// User agent string.
    pub user_agent: String,
}

impl EndpointConfig {
    /// Creates a configuration for the given endpoint URL and auth token.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(
        url: impl AsRef<str>,
        auth_token: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        let parsed = Url::parse(url.as_ref())?;
        Ok(Self {
            url: parsed,
            auth_token: auth_token.into(),
            timeout: None,
            user_agent: format!("papercut-client/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets a deadline for each call made with this configuration.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the endpoint URL as a string.
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }
}
