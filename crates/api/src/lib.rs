//! HTTP transport for fetchr resolvers.
//!
//! Resolvers never talk to the network directly; they hand a fully templated
//! [`TransportRequest`](fetchr_types::TransportRequest) to a [`Transport`] and
//! receive a buffered [`TransportResponse`](fetchr_types::TransportResponse).
//!
//! - [`Transport`]: the seam, implemented by [`ReqwestTransport`] and by
//!   in-memory doubles in tests
//! - [`TransportSettings`]: timeouts and User-Agent, optionally from the
//!   environment
//!
//! # Example
//!
//! ```ignore
//! use fetchr_api::{ReqwestTransport, Transport, TransportSettings};
//! use fetchr_types::TransportRequest;
//!
//! let transport = ReqwestTransport::new(TransportSettings::from_env())?;
//! let request = TransportRequest { method: "GET".into(), headers: Default::default(), body: None };
//! let response = transport.request("https://jsonplaceholder.typicode.com/users/1", &request).await?;
//! println!("status: {}", response.status);
//! ```

mod error;
mod reqwest_transport;
mod settings;

pub use error::TransportError;
pub use reqwest_transport::ReqwestTransport;
pub use settings::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT, ENV_CONNECT_TIMEOUT_SECS, ENV_TIMEOUT_SECS, ENV_USER_AGENT, TransportSettings,
    default_user_agent,
};

use fetchr_types::{TransportRequest, TransportResponse};

/// Performs HTTP exchanges on behalf of a resolver.
///
/// Implementations must buffer the whole response body before returning.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, url: &str, request: &TransportRequest) -> Result<TransportResponse, TransportError>;
}
