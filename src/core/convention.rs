//! File naming conventions
//!
//! A naming convention is a zero-argument function returning the variable part
//! of the output filename. The full name is `path + convention() + extension`,
//! so `"/var/log/app-" + "Jan-2024" + ".log"` yields `/var/log/app-Jan-2024.log`.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Pluggable naming convention function
pub type NamingConvention = Arc<dyn Fn() -> String + Send + Sync>;

/// How often the built-in conventions are re-evaluated
pub const DAILY_CHECK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Built-in naming conventions
///
/// Each dated variant re-evaluates once a day; whether the derived name actually
/// changed is decided by the format granularity alone.
///
/// # Examples
///
/// ```
/// use rust_convention_logger::Convention;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
/// assert_eq!(Convention::MonthYear.render_at(&at), "Jan-2024");
/// assert_eq!(Convention::Year.render_at(&at), "2024");
/// assert_eq!(Convention::DayMonthYear.render_at(&at), "Monday-Jan-2024");
/// assert_eq!(Convention::Static.render_at(&at), "");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convention {
    /// Empty fragment, never rotates: one file for the process lifetime
    #[default]
    Static,

    /// Abbreviated month and year: `Jan-2024`
    MonthYear,

    /// Year only: `2024`
    Year,

    /// Weekday, abbreviated month and year: `Monday-Jan-2024`
    DayMonthYear,
}

impl Convention {
    /// strftime pattern of this convention, `None` for [`Convention::Static`]
    #[must_use]
    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            Convention::Static => None,
            Convention::MonthYear => Some("%b-%Y"),
            Convention::Year => Some("%Y"),
            Convention::DayMonthYear => Some("%A-%b-%Y"),
        }
    }

    /// Rotation-check interval that goes with this convention
    ///
    /// `None` means no rotation timer is armed.
    #[must_use]
    pub fn rotation_interval(&self) -> Option<Duration> {
        match self {
            Convention::Static => None,
            _ => Some(DAILY_CHECK_INTERVAL),
        }
    }

    /// Render the filename fragment for a given instant
    #[must_use]
    pub fn render_at<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self.pattern() {
            Some(pattern) => at.format(pattern).to_string(),
            None => String::new(),
        }
    }

    /// Render the filename fragment for the current local time
    #[must_use]
    pub fn render(&self) -> String {
        self.render_at(&Local::now())
    }

    /// Wrap this convention as a [`NamingConvention`] function
    #[must_use]
    pub fn into_fn(self) -> NamingConvention {
        Arc::new(move || self.render())
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Static => write!(f, "static"),
            Convention::MonthYear => write!(f, "month_year"),
            Convention::Year => write!(f, "year"),
            Convention::DayMonthYear => write!(f, "day_month_year"),
        }
    }
}
