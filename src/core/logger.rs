//! File logger with a single writer thread
//!
//! Producers encode their values into payloads and push them onto a bounded
//! queue. One service loop owns the open file, drains the queue, re-evaluates
//! the naming convention on a timer and stops when asked to.

use super::{
    active_file::ActiveFile,
    config::LoggerConfig,
    convention::{Convention, NamingConvention},
    encoder::{Encoder, Payload},
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    value::Value,
};
use crate::rotation::{RotationCallback, RotationNotifier};
use crossbeam_channel::{
    bounded, never, select, tick, Receiver, SendTimeoutError, Sender, TrySendError,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How often a waiting `shutdown` re-checks whether the loop is still alive
const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Lifecycle of the service loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// Not started yet
    Idle,
    /// The loop owns the active file
    Running,
    /// The loop returned, normally or with an error; it cannot be restarted
    Stopped,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Idle => write!(f, "Idle"),
            ServiceState::Running => write!(f, "Running"),
            ServiceState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Background file logger
///
/// The output file is `path + naming_convention() + extension`. Configuration
/// is changed through the `set_*` methods while the logger is still exclusively
/// owned, i.e. before it is shared and started.
///
/// # Example
///
/// ```no_run
/// use rust_convention_logger::prelude::*;
/// use std::sync::Arc;
///
/// let mut logger = FileLogger::new("/var/log/app-", ".log", 1000)?;
/// logger.set_convention(Convention::MonthYear);
/// let logger = Arc::new(logger);
///
/// let service = logger.start()?;
/// let user = "alice";
/// let attempts = 3_u32;
/// logger.write(&[Value::text("login"), Value::text(user), Value::display(&attempts)]);
/// service.shutdown()?;
/// # Ok::<(), LoggerError>(())
/// ```
pub struct FileLogger {
    path: String,
    extension: String,
    naming_convention: NamingConvention,
    /// `None` leaves the rotation timer unarmed
    rotation_interval: Option<Duration>,
    line_terminator: String,
    encoder: Encoder,
    notifier: RotationNotifier,
    sender: Sender<Payload>,
    receiver: Receiver<Payload>,
    /// Zero-capacity: a send completes only when the loop takes it
    shutdown_tx: Sender<()>,
    shutdown_rx: Receiver<()>,
    state: Mutex<ServiceState>,
    metrics: LoggerMetrics,
}

impl FileLogger {
    /// Create a logger writing to a single static file `path + extension`
    pub fn new(
        path: impl Into<String>,
        extension: impl Into<String>,
        capacity: usize,
    ) -> Result<Self> {
        let mut config = LoggerConfig::new(path, extension);
        config.capacity = capacity;
        Self::from_config(config)
    }

    /// Create a logger from a plain configuration
    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        config.validate()?;

        let rotation_interval = config.rotation_interval();
        let (sender, receiver) = bounded(config.capacity);
        let (shutdown_tx, shutdown_rx) = bounded(0);
        let mut notifier = RotationNotifier::new(None);
        notifier.set_max_pending(config.max_pending_notifications);

        Ok(Self {
            path: config.path,
            extension: config.extension,
            naming_convention: config.convention.into_fn(),
            rotation_interval,
            line_terminator: config.line_terminator,
            encoder: Encoder::new(config.value_separator),
            notifier,
            sender,
            receiver,
            shutdown_tx,
            shutdown_rx,
            state: Mutex::new(ServiceState::Idle),
            metrics: LoggerMetrics::new(),
        })
    }

    /// Create a builder for FileLogger
    ///
    /// # Example
    /// ```
    /// use rust_convention_logger::prelude::*;
    ///
    /// let logger = FileLogger::builder("logs/app-", ".log")
    ///     .capacity(256)
    ///     .convention(Convention::Year)
    ///     .value_separator(",")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.capacity(), Some(256));
    /// ```
    #[must_use]
    pub fn builder(path: impl Into<String>, extension: impl Into<String>) -> FileLoggerBuilder {
        FileLoggerBuilder::new(path, extension)
    }

    /// Use a built-in convention together with its rotation-check interval
    pub fn set_convention(&mut self, convention: Convention) {
        self.naming_convention = convention.into_fn();
        self.rotation_interval = convention.rotation_interval();
    }

    /// Use a custom naming convention; the rotation interval is left unchanged
    pub fn set_naming_convention<F>(&mut self, convention: F)
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.naming_convention = Arc::new(convention);
    }

    /// Set how often the naming convention is re-evaluated; `None` disables rotation
    pub fn set_rotation_interval(&mut self, interval: Option<Duration>) -> Result<()> {
        if interval == Some(Duration::ZERO) {
            return Err(LoggerError::config(
                "rotation",
                "rotation interval must be positive",
            ));
        }
        self.rotation_interval = interval;
        Ok(())
    }

    /// Set the bytes written after every payload
    pub fn set_line_terminator(&mut self, terminator: impl Into<String>) {
        self.line_terminator = terminator.into();
    }

    /// Set the text written between the values of one plain write
    pub fn set_value_separator(&mut self, separator: impl Into<String>) {
        self.encoder.set_separator(separator);
    }

    /// Set the callback run after every rotation tick
    pub fn set_on_rotation(&mut self, callback: Option<RotationCallback>) {
        self.notifier.set_callback(callback);
    }

    /// Cap the number of rotation callbacks running at once; `None` for no cap
    pub fn set_max_pending_notifications(&mut self, max: Option<usize>) -> Result<()> {
        if max == Some(0) {
            return Err(LoggerError::config(
                "rotation",
                "max pending notifications must be positive",
            ));
        }
        self.notifier.set_max_pending(max);
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    #[must_use]
    pub fn rotation_interval(&self) -> Option<Duration> {
        self.rotation_interval
    }

    #[must_use]
    pub fn line_terminator(&self) -> &str {
        &self.line_terminator
    }

    #[must_use]
    pub fn value_separator(&self) -> &str {
        self.encoder.separator()
    }

    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.sender.capacity()
    }

    #[must_use]
    pub fn state(&self) -> ServiceState {
        *self.state.lock()
    }

    /// Counters for enqueued, written and dropped payloads
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Number of rotation callbacks still running
    #[must_use]
    pub fn pending_notifications(&self) -> usize {
        self.notifier.pending()
    }

    /// File name the naming convention yields right now
    #[must_use]
    pub fn current_file_name(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}{}{}",
            self.path,
            (self.naming_convention)(),
            self.extension
        ))
    }

    /// Number of payloads waiting for the service loop
    ///
    /// A snapshot only; concurrent writers and the loop move it immediately.
    #[must_use]
    pub fn queue_length(&self) -> usize {
        self.receiver.len()
    }

    /// Encode the values and queue them as one line
    ///
    /// Blocks while the queue is full.
    pub fn write(&self, values: &[Value<'_>]) {
        let payload = self.encoder.encode(values);
        self.enqueue(payload);
    }

    /// Like [`FileLogger::write`], but also echo the line to standard output first
    pub fn write_print(&self, values: &[Value<'_>]) {
        let payload = self.encoder.encode(values);
        // The echo is for interactive visibility only; a closed stdout does
        // not keep the payload from reaching the file.
        let _ = Self::echo(&payload);
        self.enqueue(payload);
    }

    /// Serialize one object as JSON and queue it as one line
    ///
    /// An object that fails to serialize is dropped silently: nothing is
    /// queued, nothing is returned, only `metrics().json_dropped()` moves.
    pub fn write_json<T: Serialize + ?Sized>(&self, object: &T) {
        match self.encoder.encode_json(object) {
            Ok(payload) => self.enqueue(payload),
            Err(_) => {
                self.metrics.record_json_dropped();
            }
        }
    }

    fn echo(payload: &Payload) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(payload.as_bytes())?;
        stdout.write_all(b"\n")?;
        stdout.flush()
    }

    fn enqueue(&self, payload: Payload) {
        match self.sender.try_send(payload) {
            Ok(()) => {}
            Err(TrySendError::Full(payload)) => {
                self.metrics.record_block();
                // send() blocks until the loop makes room
                if self.sender.send(payload).is_err() {
                    return;
                }
            }
            Err(TrySendError::Disconnected(_)) => {
                // The logger owns the receiver, so the queue cannot disconnect
                return;
            }
        }
        self.metrics.record_enqueued();
    }

    /// Run the service loop on the calling thread
    ///
    /// Returns once [`FileLogger::shutdown`] is accepted, with the error from
    /// closing the file if any. Also returns early with an error if the first
    /// file cannot be opened or a rotation tick cannot open its file.
    pub fn service(&self) -> Result<()> {
        let active = self.begin()?;
        self.run(active)
    }

    /// Open the first file on the calling thread, then run the loop on a worker thread
    pub fn start(self: &Arc<Self>) -> Result<ServiceHandle> {
        let active = self.begin()?;
        let logger = Arc::clone(self);

        let spawned = thread::Builder::new()
            .name("file-logger".to_string())
            .spawn(move || logger.run(active));

        match spawned {
            Ok(handle) => Ok(ServiceHandle {
                logger: Arc::clone(self),
                handle: Some(handle),
            }),
            Err(e) => {
                *self.state.lock() = ServiceState::Stopped;
                Err(LoggerError::io_operation(
                    "starting log service",
                    "failed to spawn worker thread",
                    e,
                ))
            }
        }
    }

    /// Ask the service loop to stop
    ///
    /// Blocks until the loop takes the signal. Returns `ServiceStopped` if the
    /// loop has terminated, or terminates while waiting.
    pub fn shutdown(&self) -> Result<()> {
        loop {
            match self.shutdown_tx.send_timeout((), SHUTDOWN_POLL_INTERVAL) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(())) => {
                    if self.state() == ServiceState::Stopped {
                        return Err(LoggerError::ServiceStopped);
                    }
                }
                Err(SendTimeoutError::Disconnected(())) => {
                    return Err(LoggerError::ServiceStopped);
                }
            }
        }
    }

    fn begin(&self) -> Result<ActiveFile> {
        {
            let mut state = self.state.lock();
            if *state != ServiceState::Idle {
                return Err(LoggerError::ServiceAlreadyStarted);
            }
            *state = ServiceState::Running;
        }

        let path = self.current_file_name();
        match ActiveFile::open(&path) {
            Ok(active) => {
                tracing::debug!(
                    file = %path.display(),
                    rotation_interval = ?self.rotation_interval,
                    "log service started"
                );
                Ok(active)
            }
            Err(e) => {
                *self.state.lock() = ServiceState::Stopped;
                Err(LoggerError::file_open(&path, e))
            }
        }
    }

    fn run(&self, active: ActiveFile) -> Result<()> {
        let result = self.event_loop(active);
        *self.state.lock() = ServiceState::Stopped;
        result
    }

    fn event_loop(&self, mut active: ActiveFile) -> Result<()> {
        let ticker = match self.rotation_interval {
            Some(interval) => tick(interval),
            None => never(),
        };

        // When several events are ready the select picks one at random, so a
        // queued payload and the shutdown signal race: no drain on shutdown.
        loop {
            select! {
                recv(ticker) -> _ => {
                    active = self.rotate(active)?;
                }
                recv(self.receiver) -> payload => {
                    // The logger keeps a sender alive, so recv only yields payloads
                    if let Ok(payload) = payload {
                        self.append(&mut active, &payload);
                    }
                }
                recv(self.shutdown_rx) -> _ => {
                    let path = active.path().to_path_buf();
                    tracing::debug!(
                        file = %path.display(),
                        pending = self.receiver.len(),
                        "log service shutting down"
                    );
                    return active.close().map_err(|e| LoggerError::file_close(&path, e));
                }
            }
        }
    }

    /// Re-open whatever file the convention names now
    ///
    /// The new name is not compared with the old one: every tick opens a fresh
    /// handle, even for the same file. The old handle is closed after the new
    /// one is open; failing to open the new one stops the service.
    fn rotate(&self, active: ActiveFile) -> Result<ActiveFile> {
        self.metrics.record_rotation();
        let new_file = self.current_file_name();
        let next = ActiveFile::open(&new_file)
            .map_err(|e| LoggerError::file_rotation(&new_file, e))?;

        let old_file = active.path().to_path_buf();
        if let Err(e) = active.close() {
            tracing::warn!(
                file = %old_file.display(),
                error = %e,
                "failed to close rotated-out log file"
            );
        }

        tracing::debug!(
            old_file = %old_file.display(),
            new_file = %new_file.display(),
            changed = old_file != new_file,
            "log file rotation tick"
        );
        self.notifier.notify(&old_file, &new_file, &self.metrics);
        Ok(next)
    }

    fn append(&self, active: &mut ActiveFile, payload: &Payload) {
        // Best-effort: a failed append or flush is counted, never returned
        // and never logged.
        match active.append(payload.as_bytes(), self.line_terminator.as_bytes()) {
            Ok(()) => self.metrics.record_written(),
            Err(_) => self.metrics.record_write_failure(),
        };
        // Buffered bytes only meet the disk here, so a failed flush is a
        // failed write too.
        if self.receiver.is_empty() && active.flush().is_err() {
            self.metrics.record_write_failure();
        }
    }
}

impl fmt::Debug for FileLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLogger")
            .field("path", &self.path)
            .field("extension", &self.extension)
            .field("rotation_interval", &self.rotation_interval)
            .field("line_terminator", &self.line_terminator)
            .field("value_separator", &self.encoder.separator())
            .field("capacity", &self.sender.capacity())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Handle to a service loop running on its own thread
///
/// Dropping the handle requests shutdown and waits for the loop.
pub struct ServiceHandle {
    logger: Arc<FileLogger>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl ServiceHandle {
    #[must_use]
    pub fn logger(&self) -> &Arc<FileLogger> {
        &self.logger
    }

    /// True once the loop has returned
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Request shutdown and wait for the loop, returning its result
    pub fn shutdown(mut self) -> Result<()> {
        // The loop's own result is more precise than ServiceStopped when it
        // had already ended.
        let _ = self.logger.shutdown();
        self.join_inner()
    }

    /// Wait for the loop without requesting shutdown
    pub fn join(mut self) -> Result<()> {
        self.join_inner()
    }

    fn join_inner(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .unwrap_or_else(|_| Err(LoggerError::other("log service thread panicked"))),
            None => Ok(()),
        }
    }
}

impl Drop for ServiceHandle {
    fn drop(&mut self) {
        if self.handle.is_none() {
            return;
        }
        let _ = self.logger.shutdown();
        if let Err(e) = self.join_inner() {
            tracing::warn!(error = %e, "log service ended with an error");
        }
    }
}

impl fmt::Debug for ServiceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceHandle")
            .field("logger", &self.logger)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Builder for constructing FileLogger with a fluent API
///
/// # Example
/// ```
/// use rust_convention_logger::prelude::*;
/// use std::path::Path;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let logger = FileLogger::builder("logs/audit-", ".txt")
///     .capacity(64)
///     .naming_convention(|| "shard-7".to_string())
///     .rotation_interval(Duration::from_secs(3600))
///     .line_terminator("\r\n")
///     .on_rotation(Arc::new(|old: &Path, new: &Path| {
///         eprintln!("rotated {} -> {}", old.display(), new.display());
///     }))
///     .build()
///     .unwrap();
///
/// assert_eq!(logger.current_file_name(), Path::new("logs/audit-shard-7.txt"));
/// ```
pub struct FileLoggerBuilder {
    config: LoggerConfig,
    naming_convention: Option<NamingConvention>,
    rotation_interval: Option<Duration>,
    on_rotation: Option<RotationCallback>,
}

impl FileLoggerBuilder {
    /// Create a new builder with default values
    pub fn new(path: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            config: LoggerConfig::new(path, extension),
            naming_convention: None,
            rotation_interval: None,
            on_rotation: None,
        }
    }

    /// Start from an existing configuration
    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            naming_convention: None,
            rotation_interval: None,
            on_rotation: None,
        }
    }

    /// Set the queue capacity
    #[must_use = "builder methods return a new value"]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Use a built-in convention and its rotation-check interval
    ///
    /// Replaces any interval set earlier; a later
    /// [`rotation_interval`](Self::rotation_interval) overrides it again.
    #[must_use = "builder methods return a new value"]
    pub fn convention(mut self, convention: Convention) -> Self {
        self.config.convention = convention;
        self.config.rotation_interval_secs = None;
        self.naming_convention = None;
        self.rotation_interval = None;
        self
    }

    /// Use a custom naming convention
    ///
    /// Without an explicit [`rotation_interval`](Self::rotation_interval) the
    /// interval of the configured built-in convention applies.
    #[must_use = "builder methods return a new value"]
    pub fn naming_convention<F>(mut self, convention: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.naming_convention = Some(Arc::new(convention));
        self
    }

    /// Override the rotation-check interval
    #[must_use = "builder methods return a new value"]
    pub fn rotation_interval(mut self, interval: Duration) -> Self {
        self.rotation_interval = Some(interval);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn line_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.config.line_terminator = terminator.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn value_separator(mut self, separator: impl Into<String>) -> Self {
        self.config.value_separator = separator.into();
        self
    }

    /// Set a callback for rotation notifications
    #[must_use = "builder methods return a new value"]
    pub fn on_rotation(mut self, callback: RotationCallback) -> Self {
        self.on_rotation = Some(callback);
        self
    }

    /// Cap the number of rotation callbacks running at once
    #[must_use = "builder methods return a new value"]
    pub fn max_pending_notifications(mut self, max: usize) -> Self {
        self.config.max_pending_notifications = Some(max);
        self
    }

    /// Build the FileLogger
    pub fn build(self) -> Result<FileLogger> {
        let mut logger = FileLogger::from_config(self.config)?;
        if let Some(convention) = self.naming_convention {
            logger.naming_convention = convention;
        }
        if let Some(interval) = self.rotation_interval {
            logger.set_rotation_interval(Some(interval))?;
        }
        logger.set_on_rotation(self.on_rotation);
        Ok(logger)
    }
}
