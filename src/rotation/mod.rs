//! Rotation notifications
//!
//! Every rotation tick can notify a user callback with the previous and the
//! new file name. Callbacks run on their own threads so a slow callback never
//! stalls the service loop.

#[cfg(feature = "archive")]
pub mod archive;
pub mod notifier;

pub use notifier::{RotationCallback, RotationNotifier};

#[cfg(feature = "archive")]
pub use archive::{compress_file, gzip_on_rotation};
