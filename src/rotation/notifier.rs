//! Fire-and-forget dispatch of rotation callbacks

use crate::core::metrics::LoggerMetrics;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Callback invoked with `(old_file, new_file)` after each rotation tick
///
/// Both paths are equal when the naming convention did not change since the
/// previous tick.
pub type RotationCallback = Arc<dyn Fn(&Path, &Path) + Send + Sync>;

/// Runs the rotation callback on independent threads
///
/// No ordering is guaranteed between successive invocations. Without a cap any
/// number of callbacks may run at once; with a cap, ticks that find the cap
/// reached skip their notification.
#[derive(Clone, Default)]
pub struct RotationNotifier {
    callback: Option<RotationCallback>,
    max_pending: Option<usize>,
    pending: Arc<AtomicUsize>,
}

/// Decrements the pending counter when the notifier thread finishes, even on panic
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl RotationNotifier {
    pub fn new(callback: Option<RotationCallback>) -> Self {
        Self {
            callback,
            max_pending: None,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_callback(&mut self, callback: Option<RotationCallback>) {
        self.callback = callback;
    }

    pub fn set_max_pending(&mut self, max_pending: Option<usize>) {
        self.max_pending = max_pending;
    }

    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    #[must_use]
    pub fn max_pending(&self) -> Option<usize> {
        self.max_pending
    }

    /// Number of callbacks currently running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Dispatch the callback for one rotation, returning without waiting for it
    pub fn notify(&self, old_file: &Path, new_file: &Path, metrics: &LoggerMetrics) {
        let Some(callback) = self.callback.clone() else {
            return;
        };

        let max_pending = self.max_pending;
        let reserved = self
            .pending
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| match max_pending {
                Some(max) if n >= max => None,
                _ => Some(n + 1),
            });
        if reserved.is_err() {
            metrics.record_notification_skipped();
            tracing::warn!(
                old_file = %old_file.display(),
                new_file = %new_file.display(),
                max_pending = ?max_pending,
                "rotation notification skipped, too many callbacks still running"
            );
            return;
        }

        let guard = PendingGuard(Arc::clone(&self.pending));
        let old_file: PathBuf = old_file.to_path_buf();
        let new_file: PathBuf = new_file.to_path_buf();

        let spawned = thread::Builder::new()
            .name("rotation-notify".to_string())
            .spawn(move || {
                let _guard = guard;
                callback(&old_file, &new_file);
            });

        match spawned {
            Ok(_) => {
                metrics.record_notification_dispatched();
            }
            Err(e) => {
                // The closure, and with it the guard, is dropped on failure
                metrics.record_notification_skipped();
                tracing::warn!(error = %e, "failed to spawn rotation notifier thread");
            }
        }
    }
}
