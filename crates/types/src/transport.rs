//! Wire-level request and response data exchanged with a transport.
//!
//! Responses are fully buffered by the transport before any rule runs, so
//! decoding the body (`json()` / `text()`) never suspends and can be repeated.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A fully templated request ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportRequest {
    /// Uppercased HTTP method, e.g. `GET` or `POST`.
    pub method: String,
    /// Header names and rendered values in configuration order.
    pub headers: IndexMap<String, String>,
    /// Serialized JSON body. `None` when the body was elided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl TransportRequest {
    /// Returns the first header whose name matches `name` case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A buffered response returned by a transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase reported for the status, e.g. `Not Found`.
    pub status_text: String,
    /// Final URL after redirects.
    pub url: String,
    /// Response headers with lowercase names.
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    /// Raw response body.
    #[serde(default)]
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            url: String::new(),
            headers: IndexMap::new(),
            body: Vec::new(),
        }
    }

    /// Sets the final URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Adds a response header; names are stored lowercase.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Replaces the body with raw text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.body = text.into().into_bytes();
        self
    }

    /// Replaces the body with the serialized form of `value`.
    pub fn with_json(mut self, value: &Value) -> Self {
        self.body = value.to_string().into_bytes();
        self
    }

    /// Whether the status is in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8 text; invalid sequences are replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body decoded as JSON.
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// The response as seen by rule templates (`res.status`, `res.statusText`, ...).
    pub fn to_context_value(&self) -> Value {
        let headers = self
            .headers
            .iter()
            .map(|(name, value)| (name.clone(), Value::String(value.clone())))
            .collect::<Map<String, Value>>();

        let mut object = Map::new();
        object.insert("status".into(), Value::from(self.status));
        object.insert("statusText".into(), Value::String(self.status_text.clone()));
        object.insert("url".into(), Value::String(self.url.clone()));
        object.insert("ok".into(), Value::Bool(self.ok()));
        object.insert("headers".into(), Value::Object(headers));
        Value::Object(object)
    }
}
