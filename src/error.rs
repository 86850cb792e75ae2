// src/error.rs

//! Unified error handling for the schedule watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Failure to retrieve the schedule document.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Network failure or timeout
    #[error("{0}")]
    Transport(String),

    /// Server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),

    /// No employee identifier is available to authenticate the request
    #[error("employee ID is missing; set it before checking the schedule")]
    MissingCredential,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Transport(err.to_string()),
        }
    }
}

/// Structural failure while parsing the schedule markup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The data table is the second schedule table on the page.
    #[error("expected at least 2 schedule tables, found {found}")]
    MissingScheduleTable { found: usize },
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetching the schedule failed
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parsing the schedule failed
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persistent store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Poll loop lifecycle misuse
    #[error("Poll error: {0}")]
    Poll(String),

    /// Background task panicked or was aborted
    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn poll(message: impl Into<String>) -> Self {
        Self::Poll(message.into())
    }

    /// Human-readable cause, without the category prefix.
    ///
    /// This is what callers show in an "unable to load schedule" state.
    pub fn cause(&self) -> String {
        match self {
            Self::Fetch(e) => e.to_string(),
            Self::Parse(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}
