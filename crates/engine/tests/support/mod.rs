#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fetchr_api::{Transport, TransportError};
use fetchr_types::{TransportRequest, TransportResponse};
use serde_json::Value;

type Responder = dyn Fn(&str, &TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync;

/// In-memory transport that records every call and answers through a closure.
pub struct RecordingTransport {
    responder: Box<Responder>,
    calls: Mutex<Vec<(String, TransportRequest)>>,
}

impl RecordingTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&str, &TransportRequest) -> Result<TransportResponse, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Always answers 200 with `body` as JSON.
    pub fn json(body: Value) -> Arc<Self> {
        Self::new(move |url, _| Ok(TransportResponse::new(200, "OK").with_url(url).with_json(&body)))
    }

    /// Always answers with `status` and a plain text body.
    pub fn status(status: u16, status_text: &'static str, text: &'static str) -> Arc<Self> {
        Self::new(move |url, _| Ok(TransportResponse::new(status, status_text).with_url(url).with_text(text)))
    }

    pub fn calls(&self) -> Vec<(String, TransportRequest)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> (String, TransportRequest) {
        self.calls().pop().expect("at least one transport call")
    }

    /// Body of the last call decoded as JSON.
    pub fn last_body(&self) -> Value {
        let (_, request) = self.last_call();
        serde_json::from_str(request.body.as_deref().expect("request body")).expect("JSON request body")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn request(&self, url: &str, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push((url.to_string(), request.clone()));
        (self.responder)(url, request)
    }
}

/// Echoes the JSON request body back, merged with `extra`.
pub fn echo_body(extra: Value) -> Arc<RecordingTransport> {
    RecordingTransport::new(move |url, request| {
        let mut body: Value = request
            .body
            .as_deref()
            .map(|text| serde_json::from_str(text).unwrap_or(Value::Null))
            .unwrap_or(Value::Null);
        if let (Value::Object(target), Value::Object(extra)) = (&mut body, &extra) {
            for (key, value) in extra {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(TransportResponse::new(200, "OK").with_url(url).with_json(&body))
    })
}
