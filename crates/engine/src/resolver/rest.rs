//! REST adapter: renders the request, calls the transport, runs the rules.

use fetchr_api::Transport;
use fetchr_types::{Config, RequestDetails, TransportRequest, TransportResponse};
use fetchr_util::value_to_text;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::ResolveError;
use crate::rules::apply_rules;
use crate::template::render;

pub(crate) const DEFAULT_METHOD: &str = "GET";

/// Everything one REST exchange produced.
#[derive(Debug)]
pub(crate) struct Exchange {
    pub value: Value,
    pub request: RequestDetails,
    pub response: TransportResponse,
}

/// Performs one templated REST call for `config`.
///
/// `config` itself is only read; headers and body are rendered into fresh
/// values.
pub(crate) async fn execute(config: &Config, transport: &dyn Transport, variables: Option<&Value>) -> Result<Exchange, ResolveError> {
    let request = build_request(config, variables);
    let url = value_to_text(Some(&render(&Value::String(config.url.clone()), variables)));

    debug!(
        method = %request.method,
        url = %url,
        header_count = request.headers.len(),
        has_body = request.body.is_some(),
        "resolver request prepared"
    );

    let response = transport.request(&url, &request).await?;
    debug!(url = %url, status = response.status, body_len = response.body.len(), "resolver response received");

    let value = apply_rules(config, &response)?;
    Ok(Exchange {
        value,
        request: RequestDetails { url, request },
        response,
    })
}

/// Method, rendered headers and serialized body for one call.
///
/// The body is left out for `GET` and when it serializes to `{}`.
pub(crate) fn build_request(config: &Config, variables: Option<&Value>) -> TransportRequest {
    let method = config.method_or(DEFAULT_METHOD);

    let headers = config
        .headers
        .iter()
        .map(|(name, template)| (name.clone(), value_to_text(Some(&render(template, variables)))))
        .collect::<IndexMap<_, _>>();

    let body = render_body(config.body.as_ref(), variables).to_string();
    let body = (method != DEFAULT_METHOD && body != "{}").then_some(body);

    TransportRequest { method, headers, body }
}

/// Renders the string members of the body; other members are sent as-is.
fn render_body(body: Option<&Value>, variables: Option<&Value>) -> Value {
    let render_member = |member: &Value| match member {
        Value::String(_) => render(member, variables),
        other => other.clone(),
    };

    match body {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(Value::Object(map)) => Value::Object(map.iter().map(|(key, member)| (key.clone(), render_member(member))).collect()),
        Some(Value::Array(items)) => Value::Array(items.iter().map(render_member).collect()),
        Some(other) => other.clone(),
    }
}
