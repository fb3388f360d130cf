//! Core logger types

pub mod active_file;
pub mod config;
pub mod convention;
pub mod encoder;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod value;

pub use active_file::ActiveFile;
pub use config::{
    LoggerConfig, DEFAULT_LINE_TERMINATOR, DEFAULT_QUEUE_CAPACITY, DEFAULT_VALUE_SEPARATOR,
};
pub use convention::{Convention, NamingConvention, DAILY_CHECK_INTERVAL};
pub use encoder::{Encoder, Payload};
pub use error::{LoggerError, Result};
pub use logger::{FileLogger, FileLoggerBuilder, ServiceHandle, ServiceState};
pub use metrics::LoggerMetrics;
pub use value::{AsLogValue, Value};
