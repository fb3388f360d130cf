//! Gzip archiving of rotated-out log files

use super::notifier::RotationCallback;
use crate::core::error::{LoggerError, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CHUNK_SIZE: usize = 64 * 1024;

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Rotation callback that compresses the previous file once the name changed
///
/// Ticks where the convention produced the same name are ignored. Failures are
/// reported through `tracing`; the original file is kept in that case.
///
/// # Example
///
/// ```no_run
/// use rust_convention_logger::prelude::*;
/// use rust_convention_logger::rotation::gzip_on_rotation;
///
/// let logger = FileLogger::builder("/var/log/app-", ".log")
///     .convention(Convention::MonthYear)
///     .on_rotation(gzip_on_rotation())
///     .build()
///     .unwrap();
/// ```
#[must_use]
pub fn gzip_on_rotation() -> RotationCallback {
    Arc::new(|old_file: &Path, new_file: &Path| {
        if old_file == new_file {
            return;
        }
        match compress_file(old_file) {
            Ok(archive) => {
                tracing::debug!(
                    source = %old_file.display(),
                    archive = %archive.display(),
                    "archived rotated log file"
                );
            }
            Err(e) => {
                tracing::warn!(source = %old_file.display(), error = %e, "failed to archive rotated log file");
            }
        }
    })
}

/// First archive name not taken yet: `<path>.gz`, then `<path>.1.gz`, `<path>.2.gz`, ...
///
/// Conventions repeat names (`Monday-Jan-2024` comes back every week), so an
/// existing archive must never be replaced.
fn next_archive_path(path: &Path) -> PathBuf {
    let mut candidate = with_suffix(path, ".gz");
    let mut n: u32 = 1;
    while candidate.exists() {
        candidate = with_suffix(path, &format!(".{}.gz", n));
        n += 1;
    }
    candidate
}

/// Compress `path` into a new archive next to it, returning the archive path
///
/// The archive is `<path>.gz`, or `<path>.<n>.gz` with the lowest free `n`
/// when earlier archives of the same name exist. It is written to a temporary
/// file first and moved into place without replacing anything; the original
/// is removed only after compression fully succeeded.
pub fn compress_file(path: &Path) -> Result<PathBuf> {
    let gz_path = next_archive_path(path);
    let temp_gz_path = with_suffix(path, ".gz.tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "archiving log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "archiving log file",
            format!("Failed to create temporary archive: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let mut encoder = GzEncoder::new(
        BufWriter::with_capacity(CHUNK_SIZE, output),
        Compression::default(),
    );

    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let bytes_read = reader.read(&mut buffer).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation(
                "archiving log file",
                format!("Failed to read from file: {}", path.display()),
                e,
            )
        })?;

        if bytes_read == 0 {
            break;
        }

        encoder.write_all(&buffer[..bytes_read]).map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("archiving log file", "Failed to compress data chunk", e)
        })?;
    }

    encoder
        .finish()
        .and_then(|mut writer| writer.flush())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_gz_path);
            LoggerError::io_operation("archiving log file", "Failed to finish compression", e)
        })?;

    // hard_link fails with AlreadyExists instead of replacing a file that
    // appeared since the name was picked
    fs::hard_link(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "archiving log file",
            format!("Failed to move archive to: {}", gz_path.display()),
            e,
        )
    })?;
    let _ = fs::remove_file(&temp_gz_path);

    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(
            source = %path.display(),
            error = %e,
            "archive written but the original file could not be removed"
        );
    }

    Ok(gz_path)
}
