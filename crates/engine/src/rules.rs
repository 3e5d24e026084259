//! # Response Rules
//!
//! Picks the first rule whose matcher accepts a response and runs its
//! applier. Every rule list ends with an implicit fallback that decodes the
//! body as JSON and applies the config's `grab` and `shape`:
//!
//! ```json
//! { "match": ["all"], "apply": ["json", "<config.grab>", "<config.shape>"] }
//! ```
//!
//! Matchers and appliers are looked up by name in fixed tables. An unknown
//! matcher name never matches; an unknown applier name is a configuration
//! error naming the rule.

use fetchr_types::{
    APPLY_JSON, APPLY_RES2JSON, APPLY_STATUS_ERROR, APPLY_THROW, APPLY_VALUE, Applier, Config, MATCH_ALL, MATCH_STATUS,
    MATCH_STATUS_ERROR, Matcher, Rule, RuleContext, TransportResponse,
};
use fetchr_util::{is_truthy, parse_body_strict, path, value_to_text};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::template::render;
use crate::{ConfigError, ResolveError};

type MatchFn = fn(&RuleContext<'_>) -> bool;
type ApplyFn = fn(&RuleContext<'_>) -> Result<Value, ResolveError>;

const MATCHERS: &[(&str, MatchFn)] = &[
    (MATCH_ALL, match_all),
    (MATCH_STATUS, match_status),
    (MATCH_STATUS_ERROR, match_status_error),
];

const APPLIERS: &[(&str, ApplyFn)] = &[
    (APPLY_JSON, apply_json),
    (APPLY_THROW, apply_throw),
    (APPLY_RES2JSON, apply_res2json),
    (APPLY_STATUS_ERROR, apply_status_error),
    (APPLY_VALUE, apply_value),
];

/// Runs the rules of `config` against a buffered response.
pub fn apply_rules(config: &Config, response: &TransportResponse) -> Result<Value, ResolveError> {
    let fallback = Rule::fallback(config.grab.as_deref(), config.shape.as_ref());

    let rule = config
        .rules
        .iter()
        .chain(std::iter::once(&fallback))
        .find(|rule| rule_matches(&RuleContext { config, rule: *rule, response }))
        .ok_or(ConfigError::NoMatchingRule)?;

    debug!(
        rule = %rule.label(),
        applier = rule.applier.name().unwrap_or("<inline>"),
        status = response.status,
        "response rule selected"
    );

    let context = RuleContext { config, rule, response };
    match &rule.applier {
        Applier::Transform(transform) => Ok(transform(&context)?),
        Applier::Named { name, .. } => {
            let apply = lookup(APPLIERS, name).ok_or_else(|| ConfigError::UnknownApplier {
                applier: name.clone(),
                rule: rule.label(),
            })?;
            apply(&context)
        }
    }
}

fn rule_matches(context: &RuleContext<'_>) -> bool {
    match &context.rule.matcher {
        Matcher::Predicate(predicate) => predicate(context),
        Matcher::Named { name, .. } => match lookup(MATCHERS, name) {
            Some(matcher) => matcher(context),
            None => {
                warn!(matcher = %name, "unknown rule matcher never matches");
                false
            }
        },
    }
}

fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Option<T> {
    table.iter().find(|(key, _)| *key == name).map(|(_, entry)| *entry)
}

/// Selects `grab` inside `data` and renders `shape` against the selection.
///
/// A missing `grab` selects everything; a falsy `shape` returns the
/// selection itself. Undefined results become `null`.
pub fn grab_and_shape(data: &Value, grab: Option<&str>, shape: Option<&Value>) -> Value {
    let grabbed = path::get(data, grab.unwrap_or_default());
    match shape {
        Some(shape) if is_truthy(Some(shape)) => render(shape, grabbed.as_ref()),
        _ => grabbed.unwrap_or(Value::Null),
    }
}

fn match_all(_: &RuleContext<'_>) -> bool {
    true
}

fn match_status(context: &RuleContext<'_>) -> bool {
    let status = u64::from(context.response.status);
    match context.rule.matcher.arg(0) {
        Some(Value::Array(codes)) => codes.iter().any(|code| code.as_u64() == Some(status)),
        Some(Value::Number(code)) => code.as_u64() == Some(status),
        _ => false,
    }
}

fn match_status_error(context: &RuleContext<'_>) -> bool {
    context.response.status >= 400
}

fn apply_json(context: &RuleContext<'_>) -> Result<Value, ResolveError> {
    let response = context.response;
    let data = parse_body_strict(&response.body, Some(response.status)).inspect_err(|error| {
        warn!(status = response.status, url = %response.url, error = %error, "response JSON decode failed");
    })?;
    let grab = context.rule.applier.arg(0).and_then(Value::as_str);
    let shape = context.rule.applier.arg(1);
    Ok(grab_and_shape(&data, grab, shape))
}

fn apply_throw(context: &RuleContext<'_>) -> Result<Value, ResolveError> {
    let template = context.rule.applier.arg(0).cloned().unwrap_or(Value::Null);
    let message = render(&template, Some(&response_context(context, None)));
    Err(ResolveError::Rule {
        message: value_to_text(Some(&message)),
    })
}

fn apply_res2json(context: &RuleContext<'_>) -> Result<Value, ResolveError> {
    let text = context.response.text();
    let template = context.rule.applier.arg(0).cloned().unwrap_or(Value::Null);
    Ok(render(&template, Some(&response_context(context, Some(text)))))
}

fn apply_status_error(context: &RuleContext<'_>) -> Result<Value, ResolveError> {
    let response = context.response;
    let mut error = Map::new();
    error.insert("err".into(), Value::String(format!("{} {}", response.status, response.status_text)));
    Ok(Value::Object(error))
}

fn apply_value(context: &RuleContext<'_>) -> Result<Value, ResolveError> {
    Ok(context.rule.applier.arg(0).cloned().unwrap_or(Value::Null))
}

/// `{res}` or `{res, text}` as seen by rule templates.
fn response_context(context: &RuleContext<'_>, text: Option<String>) -> Value {
    let mut object = Map::new();
    object.insert("res".into(), context.response.to_context_value());
    if let Some(text) = text {
        object.insert("text".into(), Value::String(text));
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetchr_types::ApplierError;
    use serde_json::json;

    fn ok_json(body: Value) -> TransportResponse {
        TransportResponse::new(200, "OK").with_json(&body)
    }

    fn not_found() -> TransportResponse {
        TransportResponse::new(404, "Not Found").with_text("no such user")
    }

    fn config_with(rules: Value) -> Config {
        serde_json::from_value(json!({"type": "rest", "url": "https://example.com", "rules": rules})).unwrap()
    }

    #[test]
    fn fallback_returns_decoded_body() {
        let config = Config::rest("https://example.com");
        assert_eq!(apply_rules(&config, &ok_json(json!({"id": 1}))).unwrap(), json!({"id": 1}));
    }

    #[test]
    fn fallback_grabs_and_shapes() {
        let config = Config::rest("https://example.com")
            .with_grab("address")
            .with_shape(json!({"value": "{{ street }}"}));
        let response = ok_json(json!({"address": {"street": "Kulas Light"}}));
        assert_eq!(apply_rules(&config, &response).unwrap(), json!({"value": "Kulas Light"}));
    }

    #[test]
    fn missing_grab_target_is_null() {
        let config = Config::rest("https://example.com").with_grab("address.zip");
        assert_eq!(apply_rules(&config, &ok_json(json!({"address": {}}))).unwrap(), Value::Null);
    }

    #[test]
    fn status_rule_throws_rendered_message() {
        let config = config_with(json!([
            {"match": ["status", [404]], "apply": ["throw", "{{res.status}} {{res.statusText}}"]}
        ]));
        let error = apply_rules(&config, &not_found()).unwrap_err();
        assert!(matches!(error, ResolveError::Rule { .. }));
        assert_eq!(error.to_string(), "404 Not Found");
    }

    #[test]
    fn status_rule_skips_other_codes() {
        let config = config_with(json!([
            {"match": ["status", [400, 404]], "apply": ["value", "failed"]}
        ]));
        assert_eq!(apply_rules(&config, &ok_json(json!([1]))).unwrap(), json!([1]));
        assert_eq!(apply_rules(&config, &not_found()).unwrap(), json!("failed"));
    }

    #[test]
    fn first_matching_rule_wins() {
        let config = config_with(json!([
            {"match": ["statusError"], "apply": ["statusError"]},
            {"match": ["status", [404]], "apply": ["value", "unreachable"]}
        ]));
        assert_eq!(apply_rules(&config, &not_found()).unwrap(), json!({"err": "404 Not Found"}));
    }

    #[test]
    fn res2json_sees_response_and_text() {
        let config = config_with(json!([
            {"match": ["status", [404]], "apply": ["res2json", {"err": true, "status": "res.status", "msg": "{{ text }}"}]}
        ]));
        assert_eq!(
            apply_rules(&config, &not_found()).unwrap(),
            json!({"err": true, "status": 404, "msg": "no such user"})
        );
    }

    #[test]
    fn value_ignores_response() {
        let config = config_with(json!([{"match": ["all"], "apply": ["value", {"fixed": [1, 2]}]}]));
        assert_eq!(apply_rules(&config, &not_found()).unwrap(), json!({"fixed": [1, 2]}));
    }

    #[test]
    fn unknown_matcher_falls_through() {
        let config = config_with(json!([{"match": ["teapot"], "apply": ["value", 1]}]));
        assert_eq!(apply_rules(&config, &ok_json(json!("fallback"))).unwrap(), json!("fallback"));
    }

    #[test]
    fn unknown_applier_names_the_rule() {
        let config = config_with(json!([{"match": ["statusError"], "apply": ["explode"]}]));
        let error = apply_rules(&config, &not_found()).unwrap_err();
        assert!(matches!(
            error,
            ResolveError::Config(ConfigError::UnknownApplier { ref applier, ref rule }) if applier == "explode" && rule == "statusError"
        ));
        assert_eq!(error.to_string(), r#"Unexpected apply "explode" for the rule "statusError""#);
    }

    #[test]
    fn undecodable_body_is_a_decode_error() {
        let config = Config::rest("https://example.com");
        let response = TransportResponse::new(200, "OK").with_text("<html>");
        assert!(matches!(apply_rules(&config, &response), Err(ResolveError::Decode(_))));
    }

    #[test]
    fn inline_matcher_and_applier() {
        let config = Config::rest("https://example.com").with_rule(Rule::new(
            Matcher::predicate(|context| context.response.status == 322),
            Applier::transform(|context| Ok(json!({"custom": context.response.status_text}))),
        ));
        let response = TransportResponse::new(322, "Custom");
        assert_eq!(apply_rules(&config, &response).unwrap(), json!({"custom": "Custom"}));
    }

    #[test]
    fn inline_applier_errors_propagate() {
        let config = Config::rest("https://example.com").with_rule(Rule::new(
            Matcher::all(),
            Applier::transform(|_| Err(ApplierError::new("nope"))),
        ));
        let error = apply_rules(&config, &ok_json(json!({}))).unwrap_err();
        assert!(matches!(error, ResolveError::Applier { .. }));
        assert_eq!(error.to_string(), "nope");
    }

    #[test]
    fn json_rule_with_its_own_grab_and_shape() {
        let config = Config::rest("https://example.com")
            .with_grab("ignored")
            .with_rule(Rule::new(Matcher::status([200]), Applier::json(Some("$0"), Some(&json!("name")))));
        let response = ok_json(json!([{"name": "Clementine Bauch"}, {"name": "Ervin"}]));
        assert_eq!(apply_rules(&config, &response).unwrap(), json!("Clementine Bauch"));
    }
}
