//! # Templates
//!
//! Renders `{{ path }}` and `{{{ path }}}` placeholders inside strings, arrays
//! and objects against a variable context.
//!
//! ## Rendering a string
//!
//! A string template is resolved in three steps, stopping at the first hit:
//!
//! 1. the string is a member of the context: that value is returned as-is
//! 2. the string is a path that resolves inside the context: that value is
//!    returned as-is (numbers stay numbers, objects stay objects)
//! 3. otherwise every `{{{ path }}}` is replaced with the percent-encoded
//!    text of the resolved value, then every `{{ path }}` with its plain text
//!
//! Missing values render as the text `undefined`. Booleans and numbers are never
//! rendered, and a missing or falsy context leaves the template untouched.
//!
//! ```rust
//! use fetchr_engine::template::render;
//! use serde_json::json;
//!
//! let context = json!({"name": "Leanne", "age": 38, "q": "a::b"});
//! assert_eq!(render(&json!("age"), Some(&context)), json!(38));
//! assert_eq!(render(&json!("Hi {{ name }}!"), Some(&context)), json!("Hi Leanne!"));
//! assert_eq!(render(&json!("q={{{q}}}"), Some(&context)), json!("q=a%3A%3Ab"));
//! ```

use fetchr_util::{encode_uri_component, is_truthy, path, value_to_text};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

static ENCODED_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{\{(.+?)\}\}\}").expect("encoded placeholder regex should compile"));
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").expect("placeholder regex should compile"));

/// Recursively renders `template` against `context`.
pub fn render(template: &Value, context: Option<&Value>) -> Value {
    match context {
        Some(context) if is_truthy(Some(context)) => render_value(template, context),
        _ => template.clone(),
    }
}

fn render_value(template: &Value, context: &Value) -> Value {
    match template {
        Value::String(text) => render_string(text, context),
        Value::Array(items) => Value::Array(items.iter().map(|item| render_value(item, context)).collect()),
        Value::Object(map) => {
            let mut rendered = Map::with_capacity(map.len());
            for (key, value) in map {
                rendered.insert(key.clone(), render_value(value, context));
            }
            Value::Object(rendered)
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => template.clone(),
    }
}

fn render_string(text: &str, context: &Value) -> Value {
    if let Some(value) = path::member(context, text) {
        return value.into_owned();
    }
    if let Some(value) = path::get(context, text) {
        return value;
    }
    Value::String(interpolate(text, context))
}

/// Placeholder substitution only, without the whole-string lookups.
pub fn interpolate(text: &str, context: &Value) -> String {
    let encoded = ENCODED_PLACEHOLDER.replace_all(text, |captures: &Captures| {
        encode_uri_component(&lookup_text(&captures[1], context))
    });
    PLACEHOLDER
        .replace_all(&encoded, |captures: &Captures| lookup_text(&captures[1], context))
        .into_owned()
}

const MISSING_TEXT: &str = "undefined";

fn lookup_text(expression: &str, context: &Value) -> String {
    match path::get(context, expression.trim()) {
        Some(value) => value_to_text(Some(&value)),
        None => MISSING_TEXT.to_string(),
    }
}
