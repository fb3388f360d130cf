//! JSON events example
//!
//! Several worker threads write JSON lines to one static file while the main
//! thread echoes progress lines to stdout as well.
//!
//! Run with: cargo run --example json_events

use rust_convention_logger::prelude::*;
use rust_convention_logger::write_print;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct JobEvent {
    worker: usize,
    job: u32,
    status: &'static str,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Convention Logger - JSON Events Example ===\n");

    let logger = Arc::new(
        FileLogger::builder("logs/events", ".jsonl")
            .capacity(64)
            .build()?,
    );
    let service = logger.start()?;

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for job in 0..25 {
                    logger.write_json(&JobEvent {
                        worker,
                        job,
                        status: "done",
                    });
                }
            })
        })
        .collect();

    write_print!(logger, "workers", "started", 4_usize);
    for worker in workers {
        if worker.join().is_err() {
            eprintln!("worker panicked");
        }
    }
    write_print!(logger, "workers", "finished");

    // Non-string map keys cannot be encoded; the event is dropped silently
    let mut unencodable: HashMap<(u8, u8), &str> = HashMap::new();
    unencodable.insert((0, 1), "edge");
    logger.write_json(&unencodable);

    service.shutdown()?;

    let metrics = logger.metrics();
    println!("\nEnqueued:     {}", metrics.payloads_enqueued());
    println!("Written:      {}", metrics.payloads_written());
    println!("JSON dropped: {}", metrics.json_dropped());
    Ok(())
}
