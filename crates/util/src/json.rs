//! Strict JSON decoding of response bodies with readable failures.

use serde_json::Value;
use thiserror::Error;

const PREVIEW_CHARS: usize = 200;

/// Error returned when a response body that must be JSON is not.
#[derive(Debug, Error)]
#[error("response body is not valid JSON ({}): {source}; body starts with: {preview}", status_label(.status))]
pub struct JsonParseError {
    status: Option<u16>,
    #[source]
    source: serde_json::Error,
    preview: String,
}

impl JsonParseError {
    /// HTTP status of the response that failed to decode, when known.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Leading characters of the body with whitespace runs collapsed.
    pub fn body_preview(&self) -> &str {
        &self.preview
    }
}

fn status_label(status: &Option<u16>) -> String {
    match *status {
        Some(code) => format!("status {code}"),
        None => "unknown status".to_string(),
    }
}

/// Parses a raw response body as JSON.
///
/// Failures carry the status code (when known) and the first 200 characters
/// of the body with whitespace runs collapsed to single spaces.
///
/// ```rust
/// use fetchr_util::json::parse_body_strict;
///
/// assert!(parse_body_strict(br#"{"id": 1}"#, Some(200)).is_ok());
///
/// let error = parse_body_strict(b"<html>oops</html>", Some(502)).unwrap_err();
/// assert!(error.to_string().contains("status 502"));
/// assert_eq!(error.body_preview(), "<html>oops</html>");
/// ```
pub fn parse_body_strict(body: &[u8], status: Option<u16>) -> Result<Value, JsonParseError> {
    serde_json::from_slice::<Value>(body).map_err(|source| JsonParseError {
        status,
        source,
        preview: body_preview(body),
    })
}

fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return "<empty>".to_string();
    }
    match collapsed.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &collapsed[..cut]),
        None => collapsed,
    }
}
