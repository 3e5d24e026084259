use std::time::Instant;

use fetchr_types::{TransportRequest, TransportResponse};
use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use tracing::{debug, warn};

use crate::{Transport, TransportError, TransportSettings};

/// [`Transport`] backed by a shared `reqwest::Client`.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Builds a client with the timeouts and User-Agent from `settings`.
    pub fn new(settings: TransportSettings) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { http })
    }

    /// Wraps an already configured client.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, url: &str, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let method = parse_method(&request.method)?;
        let headers = build_header_map(&request.headers)?;

        let start = Instant::now();
        debug!(
            method = %method,
            url = %url,
            header_count = headers.len(),
            has_body = request.body.is_some(),
            "http request started"
        );

        let mut builder = self.http.request(method.clone(), url).headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|source| {
            warn!(
                method = %method,
                url = %url,
                error = %source,
                duration_ms = start.elapsed().as_millis(),
                "http request failed"
            );
            TransportError::Request {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        let final_url = response.url().to_string();
        let response_headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect::<IndexMap<_, _>>();
        let body = response.bytes().await.map_err(|source| TransportError::Body {
            url: url.to_string(),
            source,
        })?;

        debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            body_len = body.len(),
            duration_ms = start.elapsed().as_millis(),
            "http request completed"
        );

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            url: final_url,
            headers: response_headers,
            body: body.to_vec(),
        })
    }
}

fn parse_method(method: &str) -> Result<Method, TransportError> {
    Method::from_bytes(method.as_bytes()).map_err(|_| TransportError::InvalidMethod {
        method: method.to_string(),
    })
}

fn build_header_map(headers: &IndexMap<String, String>) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| TransportError::InvalidHeader {
            name: name.clone(),
            message: error.to_string(),
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|error| TransportError::InvalidHeader {
            name: name.clone(),
            message: error.to_string(),
        })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}
