//! Error types for the logger system

use std::path::Path;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The log file could not be opened when the service started
    #[error("Failed to open log file '{path}': {source}")]
    FileOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file named by the convention could not be opened on a rotation tick
    #[error("File rotation failed for '{path}': {source}")]
    FileRotation {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Closing the active file on shutdown failed
    #[error("Failed to close log file '{path}': {source}")]
    FileClose {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// `service` or `start` was called on a logger whose loop already ran
    #[error("Log service already started")]
    ServiceAlreadyStarted,

    /// The service loop has terminated and can no longer accept a shutdown
    #[error("Log service is not running")]
    ServiceStopped,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn file_open(path: &Path, source: std::io::Error) -> Self {
        LoggerError::FileOpen {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn file_rotation(path: &Path, source: std::io::Error) -> Self {
        LoggerError::FileRotation {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn file_close(path: &Path, source: std::io::Error) -> Self {
        LoggerError::FileClose {
            path: path.display().to_string(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
