//! # Dotted Paths
//!
//! Reads and writes values inside nested JSON using dot-separated paths.
//!
//! A path token is either a member name (`address.city`), a decimal array
//! position (`items.0`), an array index token (`$0`), or one of the meta
//! tokens:
//!
//! - `$JSON`: the current value serialized as a JSON string
//! - `$LENGTH`: length of the current array (or string)
//! - `$FIRST`: first element
//! - `$LAST`: last element
//!
//! Reads never fail: as soon as a step finds nothing the whole path resolves
//! to `None`, which callers treat as "undefined" (distinct from JSON `null`).
//!
//! ```rust
//! use fetchr_util::path;
//! use serde_json::json;
//!
//! let data = json!({"users": [{"name": "Leanne"}, {"name": "Ervin"}]});
//! assert_eq!(path::get(&data, "users.$LAST.name"), Some(json!("Ervin")));
//! assert_eq!(path::get(&data, "users.$LENGTH"), Some(json!(2)));
//! assert_eq!(path::get(&data, "users.$9.name"), None);
//! ```

use std::borrow::Cow;

use serde_json::{Map, Value};

const TOKEN_JSON: &str = "$JSON";
const TOKEN_LENGTH: &str = "$LENGTH";
const TOKEN_FIRST: &str = "$FIRST";
const TOKEN_LAST: &str = "$LAST";

/// Keys that are never created or traversed by [`set`].
const RESERVED_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

/// Reads the value at `path` inside `source`.
///
/// An empty path returns `source` itself.
pub fn get(source: &Value, path: &str) -> Option<Value> {
    if path.is_empty() {
        return Some(source.clone());
    }

    let mut current = Cow::Borrowed(source);
    for token in path.split('.') {
        current = match current {
            Cow::Borrowed(value) => resolve_token(value, token)?,
            Cow::Owned(value) => Cow::Owned(resolve_token(&value, token)?.into_owned()),
        };
    }
    Some(current.into_owned())
}

/// Reads a single member without interpreting dots or `$` tokens.
///
/// Objects are keyed by name; arrays and strings accept a decimal position
/// or `length`.
pub fn member<'a>(current: &'a Value, key: &str) -> Option<Cow<'a, Value>> {
    match current {
        Value::Object(map) => map.get(key).map(Cow::Borrowed),
        Value::Array(items) => {
            if key == "length" {
                return Some(Cow::Owned(Value::from(items.len())));
            }
            items.get(parse_position(key)?).map(Cow::Borrowed)
        }
        Value::String(text) => {
            if key == "length" {
                return Some(Cow::Owned(Value::from(text.chars().count())));
            }
            text.chars()
                .nth(parse_position(key)?)
                .map(|ch| Cow::Owned(Value::String(ch.to_string())))
        }
        _ => None,
    }
}

fn resolve_token<'a>(current: &'a Value, token: &str) -> Option<Cow<'a, Value>> {
    if !token.starts_with('$') {
        return member(current, token);
    }

    match token {
        TOKEN_JSON => Some(Cow::Owned(Value::String(current.to_string()))),
        TOKEN_LENGTH => member(current, "length"),
        TOKEN_FIRST => member(current, "0"),
        TOKEN_LAST => match current {
            Value::Array(items) => items.last().map(Cow::Borrowed),
            Value::String(text) => text.chars().last().map(|ch| Cow::Owned(Value::String(ch.to_string()))),
            _ => None,
        },
        _ => match current {
            Value::Array(items) => items.get(parse_leading_index(&token[1..])?).map(Cow::Borrowed),
            _ => None,
        },
    }
}

/// A strict decimal position: digits only.
fn parse_position(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// Leading digits of an index token, so `$2` and `$2nd` both select position 2.
fn parse_leading_index(digits: &str) -> Option<usize> {
    let end = digits.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    digits[..end].parse().ok()
}

/// Writes `value` at `path` inside `source` and returns the updated value.
///
/// - a scalar `source` is replaced by `value`
/// - a `null` source starts from an empty object
/// - missing or non-container intermediates become empty objects
/// - arrays accept an existing position or the next free one
/// - paths touching `__proto__`, `constructor` or `prototype` are ignored
pub fn set(source: Value, path: &str, value: Value) -> Value {
    let mut root = match source {
        Value::Null => Value::Object(Map::new()),
        Value::Object(_) | Value::Array(_) => source,
        _ => return value,
    };

    let mut tokens: Vec<&str> = path.split('.').collect();
    let Some(last) = tokens.pop() else {
        return root;
    };
    if tokens.iter().chain(std::iter::once(&last)).any(|token| RESERVED_KEYS.contains(token)) {
        return root;
    }

    let _ = assign(&mut root, &tokens, last, value);
    root
}

/// Like [`set`] but leaves `source` untouched.
pub fn set_immutable(source: &Value, path: &str, value: Value) -> Value {
    set(source.clone(), path, value)
}

fn assign(root: &mut Value, parents: &[&str], last: &str, value: Value) -> Option<()> {
    let mut target = root;
    for token in parents {
        let slot = child_slot(target, token)?;
        if !matches!(slot, Value::Object(_) | Value::Array(_)) {
            *slot = Value::Object(Map::new());
        }
        target = slot;
    }
    *child_slot(target, last)? = value;
    Some(())
}

fn child_slot<'a>(container: &'a mut Value, token: &str) -> Option<&'a mut Value> {
    match container {
        Value::Object(map) => Some(map.entry(token.to_string()).or_insert(Value::Null)),
        Value::Array(items) => {
            let index = parse_position(token)?;
            if index == items.len() {
                items.push(Value::Null);
            }
            items.get_mut(index)
        }
        _ => None,
    }
}
