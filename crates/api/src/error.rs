use thiserror::Error;

/// Failure raised while performing an HTTP exchange.
///
/// Resolvers propagate these unchanged; nothing here is retried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid HTTP method '{method}'")]
    InvalidMethod { method: String },

    #[error("invalid header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("network error calling {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failure reported by a custom transport implementation.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
