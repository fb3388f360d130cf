//! # Rust Convention Logger
//!
//! A buffered file logger with a single writer thread and time-based file naming.
//!
//! Producers on any thread hand values to [`FileLogger::write`],
//! [`FileLogger::write_print`] or [`FileLogger::write_json`]. Each call becomes
//! one line in the active file. The file name is `path + convention + extension`,
//! where the naming convention is re-evaluated on a timer so that, for example,
//! `app-Jan-2024.log` becomes `app-Feb-2024.log` when the month changes.
//!
//! ## Features
//!
//! - **Bounded queue**: writers block instead of dropping lines when the queue is full
//! - **One writer**: lines from one producer keep their order in the file
//! - **Naming conventions**: static, month-year, year, day-month-year or any closure
//! - **Rotation callbacks**: fire-and-forget notification with the old and new file
//! - **Archiving** (`archive` feature): gzip rotated-out files
//!
//! ## Example
//!
//! ```no_run
//! use rust_convention_logger::prelude::*;
//! use rust_convention_logger::write_values;
//! use std::sync::Arc;
//!
//! let logger = Arc::new(
//!     FileLogger::builder("/var/log/app-", ".log")
//!         .convention(Convention::MonthYear)
//!         .build()?,
//! );
//! let service = logger.start()?;
//!
//! write_values!(logger, "user", "alice", "logged in after", 3_u32, "attempts");
//! logger.write_json(&serde_json::json!({ "event": "login", "user": "alice" }));
//!
//! service.shutdown()?;
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod rotation;

pub mod prelude {
    pub use crate::core::{
        AsLogValue, Convention, FileLogger, FileLoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, Result, ServiceHandle, ServiceState, Value,
    };
    pub use crate::rotation::RotationCallback;
}

pub use core::{
    AsLogValue, Convention, Encoder, FileLogger, FileLoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, NamingConvention, Payload, Result, ServiceHandle, ServiceState, Value,
    DAILY_CHECK_INTERVAL, DEFAULT_LINE_TERMINATOR, DEFAULT_QUEUE_CAPACITY,
    DEFAULT_VALUE_SEPARATOR,
};
pub use rotation::{RotationCallback, RotationNotifier};
