//! Common error types for cardfuse

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for cardfuse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across cardfuse crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax or shape error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Delimited-text syntax error (wraps csv::Error)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML syntax error (wraps toml::de::Error)
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required source file could not be found
    #[error("Required source '{source_name}' not found at {}", path.display())]
    MissingInput { source_name: String, path: PathBuf },

    /// A source file was readable but its content is unusable
    #[error("Invalid input in {}: {message}", path.display())]
    InvalidInput { path: PathBuf, message: String },
}

impl Error {
    /// Attach the offending file to a parse error
    pub fn invalid_input(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Error::InvalidInput {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
