//! Per-call options and the values a resolve call returns.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::{Config, TransportRequest, TransportResponse};

/// Options accepted by a resolve call.
///
/// `true` converts to `with_details: true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Return `(result, details)` instead of the bare result.
    pub with_details: bool,
}

impl RequestOptions {
    pub fn with_details() -> Self {
        Self { with_details: true }
    }
}

impl From<bool> for RequestOptions {
    fn from(with_details: bool) -> Self {
        Self { with_details }
    }
}

impl From<()> for RequestOptions {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

/// The request exactly as handed to the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDetails {
    /// Fully rendered URL.
    pub url: String,
    #[serde(flatten)]
    pub request: TransportRequest,
}

/// Execution details returned in details mode.
#[derive(Debug, Clone)]
pub struct Details {
    /// The config the resolver was built from.
    pub config: Arc<Config>,
    /// Variables supplied by the caller.
    pub variables: Option<Value>,
    pub request: RequestDetails,
    /// The raw transport response.
    pub response: TransportResponse,
}

/// Result of a resolve call.
#[derive(Debug, Clone)]
pub enum ResolveOutput {
    Value(Value),
    WithDetails(Value, Box<Details>),
}

impl ResolveOutput {
    pub fn value(&self) -> &Value {
        match self {
            Self::Value(value) | Self::WithDetails(value, _) => value,
        }
    }

    pub fn details(&self) -> Option<&Details> {
        match self {
            Self::Value(_) => None,
            Self::WithDetails(_, details) => Some(details),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) | Self::WithDetails(value, _) => value,
        }
    }

    pub fn into_parts(self) -> (Value, Option<Details>) {
        match self {
            Self::Value(value) => (value, None),
            Self::WithDetails(value, details) => (value, Some(*details)),
        }
    }
}
