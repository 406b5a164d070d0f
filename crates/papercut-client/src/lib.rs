//! Async XML-RPC client for administering a PaperCut print server.
//!
//! This crate is the transport half of the client: it POSTs envelopes
//! built by [`papercut_protocol`] to a configured endpoint and decodes
//! the responses. On top of the raw [`RpcClient::call`] it exposes one
//! typed method per remote operation the admin console consumes
//! (user and group management, balances, server version).
//!
//! The client holds no endpoint state: an [`EndpointConfig`] is built by
//! the caller and passed into every call, so concurrent calls against
//! different servers are independent and nothing persists between them.
//!
//! # Example
//!
//! ```ignore
//! use papercut_client::{EndpointConfig, RpcClient};
//!
//! let config = EndpointConfig::new(
//!     "https://papercut.example.com:9192/rpc/api/xmlrpc",
//!     "auth-token",
//! )?;
//! let client = RpcClient::new();
//! let users = client.list_user_accounts(&config, 0, 1000).await?;
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;

pub use api::{DEFAULT_PAGE_LIMIT, NewUser, PROP_EMAIL, PROP_FULL_NAME};
pub use client::RpcClient;
pub use config::EndpointConfig;
pub use error::{CallError, CallResult};

// Re-export the wire-level types callers see in signatures.
pub use papercut_protocol::{Fault, RpcArg, RpcValue};
