//! reqwest-backed transport

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::{ApiRequest, Method, Transport};
use crate::config::ApiConfig;
use crate::error::{ActionError, ConfigError, Result};

pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
    token: RwLock<Option<String>>,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("homeserve/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::InvalidValue(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> std::result::Result<Value, ActionError> {
        let url = self.url(&request.path);
        tracing::debug!(method = %request.method, %url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        let token = self.token.read().clone();
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ActionError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ActionError::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), %url, "request rejected");
            return Err(status_error(status.as_u16(), &body));
        }
        decode_body(&body)
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write() = token;
    }
}

fn decode_body(body: &[u8]) -> std::result::Result<Value, ActionError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

/// Turn a non-2xx response into an error, preferring the server's own
/// `message` (or `error`) text when the body is JSON.
fn status_error(status: u16, body: &[u8]) -> ActionError {
    let message = serde_json::from_slice::<Value>(body).ok().and_then(|value| {
        ["message", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
    });

    match message {
        Some(message) if !message.trim().is_empty() => ActionError::Status { status, message },
        _ => ActionError::status(status),
    }
}
