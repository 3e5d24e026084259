//! # Fetchr Types
//!
//! Shared data types for declarative remote-data resolvers:
//!
//! - [`Config`]: the declarative description of a REST or GraphQL call
//! - [`Rule`], [`Matcher`], [`Applier`]: response rules and their registry names
//! - [`TransportRequest`] / [`TransportResponse`]: what crosses the transport seam
//! - [`RequestOptions`], [`Details`], [`ResolveOutput`]: per-call options and results

pub mod config;
pub mod options;
pub mod rule;
pub mod transport;

pub use config::{Config, ConfigBundle, TYPE_GRAPHQL, TYPE_HTTP, TYPE_REST};
pub use options::{Details, RequestDetails, RequestOptions, ResolveOutput};
pub use rule::{
    APPLY_JSON, APPLY_RES2JSON, APPLY_STATUS_ERROR, APPLY_THROW, APPLY_VALUE, Applier, ApplierError, MATCH_ALL, MATCH_STATUS,
    MATCH_STATUS_ERROR, Matcher, PredicateFn, Rule, RuleContext, TransformFn,
};
pub use transport::{TransportRequest, TransportResponse};
