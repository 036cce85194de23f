//! Application error types

use std::path::PathBuf;

use echoline_domain::DomainError;
use thiserror::Error;

/// Problems with the suite definition or run settings.
///
/// These are fatal: they abort the run before any request is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The suite file could not be read.
    #[error("cannot read suite file {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The suite file is not valid YAML/JSON for a suite.
    #[error("cannot parse suite {origin}: {message}")]
    Parse {
        /// File path or `built-in`.
        origin: String,
        /// Parser message.
        message: String,
    },

    /// The suite file extension is not one we can load.
    #[error("unsupported suite format '{0}' (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),

    /// The suite parsed but is malformed.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// A run setting is out of range.
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    /// The name filter removed every case.
    #[error("no test cases match filter '{0}'")]
    NoMatchingCases(String),
}

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The suite or settings are invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Writing report output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The report could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ApplicationError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
