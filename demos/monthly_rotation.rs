//! Monthly rotation example
//!
//! Writes to `logs/app-<Mon>-<Year>.log`, re-checking the name every day, and
//! gzips the previous month's file after a rotation. A short custom interval
//! stands in for the daily check so the rotation tick is visible.
//!
//! Run with: cargo run --example monthly_rotation

use rust_convention_logger::prelude::*;
use rust_convention_logger::write_values;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    println!("=== Convention Logger - Monthly Rotation Example ===\n");

    let logger = Arc::new(
        FileLogger::builder("logs/app-", ".log")
            .convention(Convention::MonthYear)
            .rotation_interval(Duration::from_millis(500))
            .on_rotation(on_rotation())
            .build()?,
    );
    println!("Writing to {}", logger.current_file_name().display());

    let service = logger.start()?;

    for request in 0..10_u32 {
        write_values!(logger, "request", request, "handled in", 1.5_f64, "ms");
        thread::sleep(Duration::from_millis(150));
    }

    service.shutdown()?;

    let metrics = logger.metrics();
    println!("\nWritten:   {}", metrics.payloads_written());
    println!("Rotations: {}", metrics.rotations());
    println!("Blocked:   {}", metrics.block_events());
    Ok(())
}

#[cfg(feature = "archive")]
fn on_rotation() -> RotationCallback {
    rust_convention_logger::rotation::gzip_on_rotation()
}

#[cfg(not(feature = "archive"))]
fn on_rotation() -> RotationCallback {
    use std::path::Path;

    Arc::new(|old: &Path, new: &Path| {
        if old != new {
            println!("rotated {} -> {}", old.display(), new.display());
        }
    })
}
