//! Converting JSON values to text and testing them for truthiness.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Number, Value};

/// Characters left unescaped by URI component encoding.
const URI_COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes `input` as a single URI component.
///
/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped as UTF-8.
///
/// ```rust
/// use fetchr_util::text::encode_uri_component;
///
/// assert_eq!(encode_uri_component("a::b"), "a%3A%3Ab");
/// assert_eq!(encode_uri_component("rock & roll"), "rock%20%26%20roll");
/// ```
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT_ENCODE_SET).to_string()
}

/// Text form of a possibly-missing value, as spliced into templates.
///
/// - missing: empty string
/// - `null`: `null`
/// - strings: as-is
/// - numbers: display form, integral floats without a fractional part
/// - booleans: display form
/// - arrays: elements converted recursively and joined with `,`
/// - objects: compact JSON
pub fn value_to_text(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number_to_text(number),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_to_text(Some(other)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(object @ Value::Object(_)) => object.to_string(),
    }
}

fn number_to_text(number: &Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e15 => {
            format!("{}", float as i64)
        }
        _ => number.to_string(),
    }
}

/// Whether a possibly-missing value counts as "present" in a condition.
///
/// Missing, `null`, `false`, `0` and `""` are falsy; arrays and objects are
/// always truthy, even when empty.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
