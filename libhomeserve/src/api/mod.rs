//! Remote marketplace API
//!
//! The store never talks HTTP directly. It goes through [`ApiClient`], a typed
//! wrapper over a [`Transport`], so the same store can run against the real
//! API ([`http::HttpTransport`]) or scripted responses ([`mock::MockTransport`]).
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use libhomeserve::api::{ApiClient, http::HttpTransport};
//! use libhomeserve::config::ApiConfig;
//!
//! # async fn example() -> libhomeserve::Result<()> {
//! let config = ApiConfig { base_url: "https://api.example.com".to_string(), timeout_secs: None };
//! let client = ApiClient::new(Arc::new(HttpTransport::new(&config)?));
//! let services = client.fetch_services().await?;
//! println!("{} services in the catalog", services.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ActionError;

pub mod client;
pub mod http;
pub mod mock;

pub use client::{
    ApiClient, AuthResponse, LoginRequest, NearbyQuery, OtpRequest, ProfileUpdate,
    SignupRequest, SignupResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
            Method::Put => f.write_str("PUT"),
        }
    }
}

/// One JSON request against the marketplace API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below the base URL, always starting with `/api/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body,
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// `"METHOD path"`, without the query string
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Carries requests to the marketplace API.
///
/// Implementations must map every failure (transport error, non-2xx status,
/// unreadable body) to an [`ActionError`]; they never panic on bad input from
/// the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the decoded JSON body.
    ///
    /// An empty 2xx body is returned as `Value::Null`.
    async fn send(&self, request: ApiRequest) -> Result<Value, ActionError>;

    /// Bearer token attached to subsequent requests; `None` stops sending one
    fn set_token(&self, token: Option<String>);
}
