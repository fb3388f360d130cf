//! Plain, serializable logger configuration
//!
//! Everything except the closures (custom naming convention, rotation callback)
//! can be described here and loaded from any serde format.

use super::convention::Convention;
use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of payloads the queue holds before writers block
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default line terminator
pub const DEFAULT_LINE_TERMINATOR: &str = "\n";

/// Default value separator
pub const DEFAULT_VALUE_SEPARATOR: &str = " ";

/// Logger configuration
///
/// # Example
///
/// ```
/// use rust_convention_logger::{Convention, LoggerConfig};
///
/// let config: LoggerConfig = serde_json::from_str(r#"{
///     "path": "/var/log/app-",
///     "extension": ".log",
///     "capacity": 256,
///     "convention": "month_year"
/// }"#).unwrap();
///
/// assert_eq!(config.convention, Convention::MonthYear);
/// assert_eq!(config.line_terminator, "\n");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Prefix of every file name, usually a directory plus a stem
    pub path: String,

    /// Suffix of every file name, including the dot
    pub extension: String,

    /// Queue capacity; must be positive
    pub capacity: usize,

    /// Built-in naming convention
    pub convention: Convention,

    /// Rotation-check interval in seconds; falls back to the convention's own
    /// interval when absent
    pub rotation_interval_secs: Option<u64>,

    /// Written after every payload
    pub line_terminator: String,

    /// Written between the values of one plain write
    pub value_separator: String,

    /// Upper bound on concurrently running rotation callbacks
    pub max_pending_notifications: Option<usize>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            extension: ".log".to_string(),
            capacity: DEFAULT_QUEUE_CAPACITY,
            convention: Convention::default(),
            rotation_interval_secs: None,
            line_terminator: DEFAULT_LINE_TERMINATOR.to_string(),
            value_separator: DEFAULT_VALUE_SEPARATOR.to_string(),
            max_pending_notifications: None,
        }
    }
}

impl LoggerConfig {
    pub fn new(path: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extension: extension.into(),
            ..Self::default()
        }
    }

    /// Effective rotation-check interval
    #[must_use]
    pub fn rotation_interval(&self) -> Option<Duration> {
        self.rotation_interval_secs
            .map(Duration::from_secs)
            .or_else(|| self.convention.rotation_interval())
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(LoggerError::config("queue", "capacity must be positive"));
        }
        if self.rotation_interval_secs == Some(0) {
            return Err(LoggerError::config(
                "rotation",
                "rotation interval must be positive",
            ));
        }
        if self.max_pending_notifications == Some(0) {
            return Err(LoggerError::config(
                "rotation",
                "max pending notifications must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::convention::DAILY_CHECK_INTERVAL;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::new("/tmp/app", ".txt");
        assert_eq!(config.path, "/tmp/app");
        assert_eq!(config.extension, ".txt");
        assert_eq!(config.capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(config.convention, Convention::Static);
        assert_eq!(config.rotation_interval(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_interval_follows_convention() {
        let mut config = LoggerConfig::new("app-", ".log");
        config.convention = Convention::Year;
        assert_eq!(config.rotation_interval(), Some(DAILY_CHECK_INTERVAL));

        config.rotation_interval_secs = Some(60);
        assert_eq!(config.rotation_interval(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = LoggerConfig::new("app", ".log");
        config.capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(LoggerError::InvalidConfiguration { .. })
        ));

        let mut config = LoggerConfig::new("app", ".log");
        config.rotation_interval_secs = Some(0);
        assert!(config.validate().is_err());

        let mut config = LoggerConfig::new("app", ".log");
        config.max_pending_notifications = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_roundtrip_keeps_separators() {
        let mut config = LoggerConfig::new("logs/app-", ".csv");
        config.value_separator = ",".to_string();
        config.line_terminator = "\r\n".to_string();

        let json = serde_json::to_string(&config).unwrap();
        let parsed: LoggerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
