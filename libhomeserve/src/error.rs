//! Error types for Homeserve

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HomeserveError>;

#[derive(Error, Debug)]
pub enum HomeserveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request failed: {0}")]
    Action(#[from] ActionError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl HomeserveError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HomeserveError::InvalidInput(_) => 3,
            HomeserveError::Action(ActionError::Validation(_)) => 3,
            HomeserveError::Action(e) if e.is_unauthorized() => 2,
            HomeserveError::Action(_) => 1,
            HomeserveError::Config(_) => 1,
            HomeserveError::Persist(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Storage IO failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure of a single remote-backed action.
///
/// This is what a slice stores in its `error` field. Every variant renders a
/// human-readable message through `Display`; consumers that only need the
/// message can call `to_string()`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ActionError {
    /// The request never produced an HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Rejected locally before any request was sent
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("{0}")]
    Unknown(String),
}

impl ActionError {
    /// Build a status error with the generic message used when the body
    /// carries none.
    pub fn status(status: u16) -> Self {
        ActionError::Status {
            status,
            message: format!("Request failed with status code {}", status),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ActionError::Status { status: 401, .. })
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            ActionError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(error: serde_json::Error) -> Self {
        ActionError::Decode(error.to_string())
    }
}
