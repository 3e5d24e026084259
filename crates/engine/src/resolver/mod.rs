//! Resolvers built from a [`Config`].
//!
//! The config's `type` selects an adapter from a fixed table:
//!
//! | type      | adapter  |
//! |-----------|----------|
//! | `rest`    | REST     |
//! | `http`    | REST     |
//! | `graphql` | GraphQL  |

mod graphql;
mod rest;

use std::fmt;
use std::sync::Arc;

use fetchr_api::{ReqwestTransport, Transport, TransportSettings};
use fetchr_types::{Config, Details, RequestOptions, ResolveOutput, TYPE_GRAPHQL, TYPE_HTTP, TYPE_REST};
use serde_json::Value;
use tracing::debug;

use crate::{ConfigError, ResolveError};
use graphql::GraphQlAdapter;

#[derive(Debug, Clone)]
enum Adapter {
    Rest,
    GraphQl(GraphQlAdapter),
}

type AdapterCtor = fn(&Config) -> Adapter;

const ADAPTERS: &[(&str, AdapterCtor)] = &[(TYPE_REST, rest_adapter), (TYPE_HTTP, rest_adapter), (TYPE_GRAPHQL, graphql_adapter)];

fn rest_adapter(_: &Config) -> Adapter {
    Adapter::Rest
}

fn graphql_adapter(config: &Config) -> Adapter {
    Adapter::GraphQl(GraphQlAdapter::new(config))
}

/// A reusable fetch built from one [`Config`].
///
/// Cloning is cheap and clones may resolve concurrently; nothing mutable is
/// shared between calls.
#[derive(Clone)]
pub struct Resolver {
    config: Arc<Config>,
    adapter: Adapter,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("config", &self.config)
            .field("adapter", &self.adapter)
            .finish_non_exhaustive()
    }
}

/// Builds a resolver that talks HTTP through a [`ReqwestTransport`]
/// configured from the environment.
pub fn create_resolver(config: Config) -> Result<Resolver, ConfigError> {
    let transport = ReqwestTransport::new(TransportSettings::from_env())?;
    create_resolver_with_transport(config, Arc::new(transport))
}

/// Builds a resolver on top of a caller supplied transport.
pub fn create_resolver_with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Resolver, ConfigError> {
    let ctor = ADAPTERS
        .iter()
        .find(|(kind, _)| *kind == config.kind)
        .map(|(_, ctor)| *ctor)
        .ok_or_else(|| ConfigError::UnknownResolverType {
            kind: config.kind.clone(),
        })?;

    let adapter = ctor(&config);
    debug!(kind = %config.kind, url = %config.url, rule_count = config.rules.len(), "resolver created");
    Ok(Resolver {
        config: Arc::new(config),
        adapter,
        transport,
    })
}

impl Resolver {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Performs the call described by the config with `variables`.
    ///
    /// Details mode (result plus [`Details`]) is selected by
    /// `options.with_details` or by passing `true` as the variables.
    pub async fn resolve(&self, variables: Option<Value>, options: impl Into<RequestOptions>) -> Result<ResolveOutput, ResolveError> {
        let with_details = options.into().with_details || matches!(variables, Some(Value::Bool(true)));

        let exchange = match &self.adapter {
            Adapter::Rest => rest::execute(&self.config, self.transport.as_ref(), variables.as_ref()).await?,
            Adapter::GraphQl(adapter) => {
                adapter
                    .execute(&self.config, self.transport.as_ref(), variables.as_ref())
                    .await?
            }
        };

        if !with_details {
            return Ok(ResolveOutput::Value(exchange.value));
        }
        let details = Details {
            config: Arc::clone(&self.config),
            variables,
            request: exchange.request,
            response: exchange.response,
        };
        Ok(ResolveOutput::WithDetails(exchange.value, Box::new(details)))
    }

    /// Shorthand for [`resolve`](Self::resolve) without details.
    pub async fn resolve_value(&self, variables: Option<Value>) -> Result<Value, ResolveError> {
        Ok(self.resolve(variables, RequestOptions::default()).await?.into_value())
    }
}
