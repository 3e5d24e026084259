//! Response rules: a matcher that decides whether a rule fires and an
//! applier that turns the response into the resolver result.
//!
//! Rules are written in configuration as two arrays whose first element is a
//! registry name and whose remaining elements are arguments:
//!
//! ```json
//! { "match": ["status", [400, 404]], "apply": ["throw", "{{ res.status }} {{ res.statusText }}"] }
//! ```
//!
//! Inline closures can be attached programmatically with [`Matcher::predicate`]
//! and [`Applier::transform`].

use std::fmt;
use std::sync::Arc;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{Config, TransportResponse};

/// Name of the matcher that accepts every response.
pub const MATCH_ALL: &str = "all";
/// Name of the matcher that accepts a listed set of status codes.
pub const MATCH_STATUS: &str = "status";
/// Name of the matcher that accepts any status >= 400.
pub const MATCH_STATUS_ERROR: &str = "statusError";

/// Name of the applier that decodes JSON, grabs and shapes it.
pub const APPLY_JSON: &str = "json";
/// Name of the applier that raises a templated error.
pub const APPLY_THROW: &str = "throw";
/// Name of the applier that renders a template against the response and its text.
pub const APPLY_RES2JSON: &str = "res2json";
/// Name of the applier that reports `{err: "<status> <statusText>"}`.
pub const APPLY_STATUS_ERROR: &str = "statusError";
/// Name of the applier that returns its argument literally.
pub const APPLY_VALUE: &str = "value";

/// Everything a matcher or applier may inspect.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub config: &'a Config,
    pub rule: &'a Rule,
    pub response: &'a TransportResponse,
}

/// Inline matcher signature.
pub type PredicateFn = dyn Fn(&RuleContext<'_>) -> bool + Send + Sync;
/// Inline applier signature.
pub type TransformFn = dyn Fn(&RuleContext<'_>) -> Result<Value, ApplierError> + Send + Sync;

/// Error returned by an inline applier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApplierError {
    pub message: String,
}

impl ApplierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Decides whether a rule applies to a response.
#[derive(Clone)]
pub enum Matcher {
    /// A matcher from the fixed registry plus its arguments.
    Named { name: String, args: Vec<Value> },
    /// An inline predicate.
    Predicate(Arc<PredicateFn>),
}

impl Matcher {
    pub fn named(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Named { name: name.into(), args }
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    pub fn all() -> Self {
        Self::named(MATCH_ALL, Vec::new())
    }

    pub fn status(codes: impl IntoIterator<Item = u16>) -> Self {
        let codes = codes.into_iter().map(Value::from).collect::<Vec<_>>();
        Self::named(MATCH_STATUS, vec![Value::Array(codes)])
    }

    pub fn status_error() -> Self {
        Self::named(MATCH_STATUS_ERROR, Vec::new())
    }

    /// Registry name, or `None` for inline predicates.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            Self::Predicate(_) => None,
        }
    }

    /// Argument at `position`, counting from the first element after the name.
    pub fn arg(&self, position: usize) -> Option<&Value> {
        match self {
            Self::Named { args, .. } => args.get(position),
            Self::Predicate(_) => None,
        }
    }
}

/// Produces the resolver result from a matched response.
#[derive(Clone)]
pub enum Applier {
    /// An applier from the fixed registry plus its arguments.
    Named { name: String, args: Vec<Value> },
    /// An inline transform.
    Transform(Arc<TransformFn>),
}

impl Applier {
    pub fn named(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self::Named { name: name.into(), args }
    }

    pub fn transform<F>(transform: F) -> Self
    where
        F: Fn(&RuleContext<'_>) -> Result<Value, ApplierError> + Send + Sync + 'static,
    {
        Self::Transform(Arc::new(transform))
    }

    /// `["json", grab, shape]`; absent parts are stored as `null`.
    pub fn json(grab: Option<&str>, shape: Option<&Value>) -> Self {
        let grab = grab.map(|path| Value::String(path.to_string())).unwrap_or(Value::Null);
        let shape = shape.cloned().unwrap_or(Value::Null);
        Self::named(APPLY_JSON, vec![grab, shape])
    }

    pub fn throw(message_template: impl Into<String>) -> Self {
        Self::named(APPLY_THROW, vec![Value::String(message_template.into())])
    }

    pub fn res2json(template: Value) -> Self {
        Self::named(APPLY_RES2JSON, vec![template])
    }

    pub fn status_error() -> Self {
        Self::named(APPLY_STATUS_ERROR, Vec::new())
    }

    pub fn value(value: Value) -> Self {
        Self::named(APPLY_VALUE, vec![value])
    }

    /// Registry name, or `None` for inline transforms.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => Some(name),
            Self::Transform(_) => None,
        }
    }

    /// Argument at `position`, counting from the first element after the name.
    pub fn arg(&self, position: usize) -> Option<&Value> {
        match self {
            Self::Named { args, .. } => args.get(position),
            Self::Transform(_) => None,
        }
    }
}

/// A (matcher, applier) pair.
#[derive(Clone, Deserialize)]
pub struct Rule {
    #[serde(rename = "match")]
    pub matcher: Matcher,
    #[serde(rename = "apply")]
    pub applier: Applier,
}

impl Rule {
    pub fn new(matcher: Matcher, applier: Applier) -> Self {
        Self { matcher, applier }
    }

    /// The implicit last rule: match everything, decode JSON, grab and shape.
    pub fn fallback(grab: Option<&str>, shape: Option<&Value>) -> Self {
        Self::new(Matcher::all(), Applier::json(grab, shape))
    }

    /// Human readable label used in diagnostics.
    pub fn label(&self) -> String {
        self.matcher.name().unwrap_or("<inline>").to_string()
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args } => f.debug_struct("Named").field("name", name).field("args", args).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

impl fmt::Debug for Applier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { name, args } => f.debug_struct("Named").field("name", name).field("args", args).finish(),
            Self::Transform(_) => f.write_str("Transform(<fn>)"),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("match", &self.matcher)
            .field("apply", &self.applier)
            .finish()
    }
}

/// Splits `[name, ...args]` (or a bare `name`) into its parts.
fn split_tagged<'de, D>(deserializer: D) -> Result<(String, Vec<Value>), D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(name) => Ok((name, Vec::new())),
        Value::Array(mut items) => {
            if items.is_empty() {
                return Err(de::Error::custom("rule entry must start with a name"));
            }
            match items.remove(0) {
                Value::String(name) => Ok((name, items)),
                other => Err(de::Error::custom(format!("rule entry name must be a string, got {other}"))),
            }
        }
        other => Err(de::Error::custom(format!("expected [name, ...args], got {other}"))),
    }
}

impl<'de> Deserialize<'de> for Matcher {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (name, args) = split_tagged(deserializer)?;
        Ok(Self::Named { name, args })
    }
}

impl<'de> Deserialize<'de> for Applier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (name, args) = split_tagged(deserializer)?;
        Ok(Self::Named { name, args })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_array_form() {
        let rule: Rule = serde_json::from_value(json!({
            "match": ["status", [400, 404]],
            "apply": ["throw", "{{ res.status }} {{ res.statusText }}"]
        }))
        .unwrap();

        assert_eq!(rule.matcher.name(), Some("status"));
        assert_eq!(rule.matcher.arg(0), Some(&json!([400, 404])));
        assert_eq!(rule.applier.name(), Some("throw"));
        assert_eq!(rule.applier.arg(0), Some(&json!("{{ res.status }} {{ res.statusText }}")));
        assert_eq!(rule.applier.arg(1), None);
    }

    #[test]
    fn deserializes_bare_names() {
        let rule: Rule = serde_json::from_value(json!({"match": "statusError", "apply": ["statusError"]})).unwrap();
        assert_eq!(rule.matcher.name(), Some("statusError"));
        assert_eq!(rule.applier.name(), Some("statusError"));
    }

    #[test]
    fn rejects_nameless_entries() {
        let error = serde_json::from_value::<Rule>(json!({"match": [], "apply": ["value", 1]}))
            .err()
            .map(|error| error.to_string())
            .unwrap_or_default();
        assert!(error.contains("must start with a name"), "{error}");

        assert!(serde_json::from_value::<Rule>(json!({"match": [42], "apply": ["value"]})).is_err());
    }

    #[test]
    fn fallback_stores_missing_parts_as_null() {
        let rule = Rule::fallback(None, None);
        assert_eq!(rule.matcher.name(), Some(MATCH_ALL));
        assert_eq!(rule.applier.name(), Some(APPLY_JSON));
        assert_eq!(rule.applier.arg(0), Some(&Value::Null));
        assert_eq!(rule.applier.arg(1), Some(&Value::Null));
    }

    #[test]
    fn inline_parts_report_no_name() {
        let rule = Rule::new(
            Matcher::predicate(|context| context.response.status == 322),
            Applier::transform(|context| Ok(Value::String(context.response.status_text.clone()))),
        );
        assert_eq!(rule.matcher.name(), None);
        assert_eq!(rule.label(), "<inline>");
        assert_eq!(format!("{:?}", rule.applier), "Transform(<fn>)");
    }
}
