//! Macros for writing heterogeneous values without building a `Value` slice by hand.
//!
//! Every argument is converted through [`AsLogValue`](crate::AsLogValue):
//! strings and byte containers are written as-is, numbers and other primitives
//! through `Display`. Numeric literals need a type suffix (`42_u32`); any other
//! displayable type can be passed as `&value as &dyn std::fmt::Display`.
//!
//! # Examples
//!
//! ```
//! use rust_convention_logger::prelude::*;
//! use rust_convention_logger::write_values;
//!
//! let logger = FileLogger::new("unused", ".log", 8).unwrap();
//!
//! let user = String::from("alice");
//! write_values!(logger, "login", user, 3_u32);
//! write_values!(logger, b"raw bytes", 0.5_f64, true);
//!
//! assert_eq!(logger.queue_length(), 2);
//! ```

/// Write any number of values as one line.
///
/// # Examples
///
/// ```
/// # use rust_convention_logger::prelude::*;
/// # let logger = FileLogger::new("unused", ".log", 4).unwrap();
/// use rust_convention_logger::write_values;
/// let status = 200_u16;
/// write_values!(logger, "GET", "/health", status);
/// ```
#[macro_export]
macro_rules! write_values {
    ($logger:expr $(, $value:expr)* $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::AsLogValue as _;
        $logger.write(&[$((&$value).as_log_value()),*])
    }};
}

/// Write any number of values as one line and echo it to standard output.
///
/// # Examples
///
/// ```
/// # use rust_convention_logger::prelude::*;
/// # let logger = FileLogger::new("unused", ".log", 4).unwrap();
/// use rust_convention_logger::write_print;
/// write_print!(logger, "cache", "warmed", 1024_usize);
/// ```
#[macro_export]
macro_rules! write_print {
    ($logger:expr $(, $value:expr)* $(,)?) => {{
        #[allow(unused_imports)]
        use $crate::AsLogValue as _;
        $logger.write_print(&[$((&$value).as_log_value()),*])
    }};
}
