//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Search Widget
//!
//! Every fallible operation in the crate returns `Result<T, AppError>`. Query
//! execution errors never escape the controller; they are logged there and
//! turned into widget state. Configuration and terminal errors surface to
//! `main`.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for all widget operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Standard IO error, auto-converted from `io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport-level failure: connection refused, DNS, timeout, TLS.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code.
    #[error("Response status: {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body was not the expected JSON document.
    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Configured endpoint is not a usable URL.
    #[error("Invalid search endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A config value is present but unusable.
    #[error("Invalid config value: {field} - {message}")]
    InvalidConfig { field: String, message: String },

    /// Terminal I/O or rendering error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    /// Create a status error from a response status and the requested URL
    pub fn status<S: Into<String>>(status: u16, url: S) -> Self {
        Self::Status {
            status,
            url: url.into(),
        }
    }

    /// Create an invalid endpoint error
    pub fn invalid_endpoint<S1: Into<String>, S2: Into<String>>(endpoint: S1, reason: S2) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the failure came from the remote side rather than local setup.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Decode(_))
    }
}

// Allow conversion from `anyhow::Error` as fallback.
impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        Self::Other(e.to_string())
    }
}
