//! GraphQL adapter.
//!
//! A GraphQL call is a REST call whose body is `{query, variables}`. After the
//! REST rules ran, a non-empty top-level `errors` array in the response turns
//! the call into a failure; otherwise `grab` and `shape` are applied to the
//! REST result.

use std::sync::Arc;

use fetchr_api::Transport;
use fetchr_types::{Config, TYPE_REST, TransportResponse};
use fetchr_util::{path, value_to_text};
use serde_json::{Map, Value};
use tracing::warn;

use crate::ResolveError;
use crate::resolver::rest::{self, Exchange};
use crate::rules::grab_and_shape;
use crate::template::render;

pub(crate) const DEFAULT_METHOD: &str = "POST";
pub(crate) const CONTENT_TYPE_HEADER: &str = "Content-type";
pub(crate) const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";
const ERROR_SEPARATOR: &str = " :: ";

#[derive(Debug, Clone)]
pub(crate) struct GraphQlAdapter {
    /// REST config shared by every call; only the body changes per call.
    rest_template: Arc<Config>,
}

impl GraphQlAdapter {
    pub(crate) fn new(config: &Config) -> Self {
        let mut headers = config
            .headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect::<Map<_, _>>();
        headers.insert(CONTENT_TYPE_HEADER.to_string(), Value::String(CONTENT_TYPE_JSON.to_string()));

        let rest_template = Config {
            kind: TYPE_REST.to_string(),
            url: config.url.clone(),
            method: Some(config.method_or(DEFAULT_METHOD)),
            headers,
            rules: config.rules.clone(),
            ..Config::default()
        };
        Self {
            rest_template: Arc::new(rest_template),
        }
    }

    pub(crate) async fn execute(
        &self,
        config: &Config,
        transport: &dyn Transport,
        variables: Option<&Value>,
    ) -> Result<Exchange, ResolveError> {
        let mut rest_config = Config::clone(&self.rest_template);
        rest_config.body = Some(request_body(config, variables));

        let exchange = rest::execute(&rest_config, transport, variables).await?;
        if let Some(message) = graphql_errors(&exchange.response) {
            warn!(url = %exchange.request.url, status = exchange.response.status, error = %message, "graphql response carried errors");
            return Err(ResolveError::GraphQl { message });
        }

        Ok(Exchange {
            value: grab_and_shape(&exchange.value, config.grab.as_deref(), config.shape.as_ref()),
            ..exchange
        })
    }
}

/// `{query, variables}`; members without a value are left out.
fn request_body(config: &Config, variables: Option<&Value>) -> Value {
    let query_variables = match &config.variables {
        Some(templates) => Some(Value::Object(
            templates
                .iter()
                .map(|(name, template)| (name.clone(), render(template, variables)))
                .collect(),
        )),
        None => variables.cloned(),
    };

    let mut body = Map::new();
    if let Some(query) = &config.query {
        body.insert("query".into(), Value::String(query.clone()));
    }
    if let Some(query_variables) = query_variables {
        body.insert("variables".into(), query_variables);
    }
    Value::Object(body)
}

/// Joined `errors[].message` of a JSON response, if it reports any.
fn graphql_errors(response: &TransportResponse) -> Option<String> {
    let body = response.json().ok()?;
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let messages = errors
        .iter()
        .map(|error| value_to_text(path::get(error, "message").as_ref()))
        .collect::<Vec<_>>();
    Some(messages.join(ERROR_SEPARATOR))
}
