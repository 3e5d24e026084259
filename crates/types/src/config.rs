//! Declarative resolver configuration.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::Rule;

/// Adapter tag for plain REST calls.
pub const TYPE_REST: &str = "rest";
/// Alias of [`TYPE_REST`].
pub const TYPE_HTTP: &str = "http";
/// Adapter tag for GraphQL calls.
pub const TYPE_GRAPHQL: &str = "graphql";

/// A remote-data fetch described as data.
///
/// String members are templates rendered against the caller's variables at
/// resolve time. A `Config` is never mutated by the resolver built from it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Adapter tag: `rest`, `http` or `graphql`.
    #[serde(rename = "type")]
    pub kind: String,
    /// URL template.
    #[serde(default)]
    pub url: String,
    /// HTTP method; `GET` for REST and `POST` for GraphQL when absent.
    #[serde(default)]
    pub method: Option<String>,
    /// Header templates.
    #[serde(default)]
    pub headers: Map<String, Value>,
    /// Body; string members are rendered as templates.
    #[serde(default)]
    pub body: Option<Value>,
    /// GraphQL document, sent verbatim (graphql only).
    #[serde(default)]
    pub query: Option<String>,
    /// GraphQL variable templates (graphql only).
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
    /// Path selecting a sub-tree of the decoded response.
    #[serde(default)]
    pub grab: Option<String>,
    /// Template rendered against the grabbed data.
    #[serde(default)]
    pub shape: Option<Value>,
    /// Response rules, tried in order before the implicit fallback.
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Config {
    /// A REST config for `url`.
    pub fn rest(url: impl Into<String>) -> Self {
        Self {
            kind: TYPE_REST.to_string(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// A GraphQL config posting `query` to `url`.
    pub fn graphql(url: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            kind: TYPE_GRAPHQL.to_string(),
            url: url.into(),
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_variables(mut self, variables: Map<String, Value>) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn with_grab(mut self, grab: impl Into<String>) -> Self {
        self.grab = Some(grab.into());
        self
    }

    pub fn with_shape(mut self, shape: Value) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Parses a config from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Parses a config from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// The configured method uppercased, or `default` when unset or blank.
    pub fn method_or(&self, default: &str) -> String {
        match self.method.as_deref().map(str::trim) {
            Some(method) if !method.is_empty() => method.to_ascii_uppercase(),
            _ => default.to_string(),
        }
    }
}

/// Several named configs loaded from one document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigBundle {
    pub resolvers: IndexMap<String, Config>,
}
