//! Logger metrics for observability
//!
//! The write path swallows per-payload failures; these counters are
//! the only place such failures become visible.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing logger activity
///
/// # Example
///
/// ```
/// use rust_convention_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_written();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.payloads_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// assert!((metrics.failure_rate() - 50.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Payloads accepted onto the queue
    payloads_enqueued: AtomicU64,

    /// Payloads handed to the active file
    payloads_written: AtomicU64,

    /// Payloads whose append to the active file failed
    write_failures: AtomicU64,

    /// JSON writes dropped because serialization failed
    json_dropped: AtomicU64,

    /// Enqueues that found the queue full and had to wait
    block_events: AtomicU64,

    /// Rotation ticks that re-opened the active file
    rotations: AtomicU64,

    /// Rotation callbacks handed to a notifier thread
    notifications_dispatched: AtomicU64,

    /// Rotation callbacks skipped because the notifier cap was reached
    notifications_skipped: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            payloads_enqueued: AtomicU64::new(0),
            payloads_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            json_dropped: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            notifications_dispatched: AtomicU64::new(0),
            notifications_skipped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn payloads_enqueued(&self) -> u64 {
        self.payloads_enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn payloads_written(&self) -> u64 {
        self.payloads_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn json_dropped(&self) -> u64 {
        self.json_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn notifications_dispatched(&self) -> u64 {
        self.notifications_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn notifications_skipped(&self) -> u64 {
        self.notifications_skipped.load(Ordering::Relaxed)
    }

    /// Record a payload accepted onto the queue
    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.payloads_enqueued.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a payload written to the active file
    #[inline]
    pub fn record_written(&self) -> u64 {
        self.payloads_written.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a payload whose append failed
    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a JSON write dropped on serialization failure
    #[inline]
    pub fn record_json_dropped(&self) -> u64 {
        self.json_dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Record an enqueue that blocked on a full queue
    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a rotation tick
    #[inline]
    pub fn record_rotation(&self) -> u64 {
        self.rotations.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_notification_dispatched(&self) -> u64 {
        self.notifications_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_notification_skipped(&self) -> u64 {
        self.notifications_skipped.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of processed payloads whose append failed, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been processed.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures() as f64;
        let total = self.payloads_written() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.payloads_enqueued.store(0, Ordering::Relaxed);
        self.payloads_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.json_dropped.store(0, Ordering::Relaxed);
        self.block_events.store(0, Ordering::Relaxed);
        self.rotations.store(0, Ordering::Relaxed);
        self.notifications_dispatched.store(0, Ordering::Relaxed);
        self.notifications_skipped.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            payloads_enqueued: AtomicU64::new(self.payloads_enqueued()),
            payloads_written: AtomicU64::new(self.payloads_written()),
            write_failures: AtomicU64::new(self.write_failures()),
            json_dropped: AtomicU64::new(self.json_dropped()),
            block_events: AtomicU64::new(self.block_events()),
            rotations: AtomicU64::new(self.rotations()),
            notifications_dispatched: AtomicU64::new(self.notifications_dispatched()),
            notifications_skipped: AtomicU64::new(self.notifications_skipped()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.payloads_enqueued(), 0);
        assert_eq!(metrics.payloads_written(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.json_dropped(), 0);
        assert_eq!(metrics.block_events(), 0);
        assert_eq!(metrics.rotations(), 0);
    }

    #[test]
    fn test_record_returns_previous_value() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_written(), 0);
        assert_eq!(metrics.record_written(), 1);
        assert_eq!(metrics.payloads_written(), 2);
    }

    #[test]
    fn test_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_written();
        }
        for _ in 0..10 {
            metrics.record_write_failure();
        }

        let rate = metrics.failure_rate();
        assert!((9.9..=10.1).contains(&rate), "Failure rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_enqueued();
        metrics.record_rotation();
        metrics.record_notification_skipped();

        metrics.reset();

        assert_eq!(metrics.payloads_enqueued(), 0);
        assert_eq!(metrics.rotations(), 0);
        assert_eq!(metrics.notifications_skipped(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_json_dropped();

        let snapshot = metrics.clone();
        metrics.record_json_dropped();

        assert_eq!(metrics.json_dropped(), 2);
        assert_eq!(snapshot.json_dropped(), 1);
    }
}
