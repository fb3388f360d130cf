//! Stress tests for the bounded queue and the single writer
//!
//! These tests verify:
//! - Writers block instead of dropping lines when the queue is full
//! - Per-producer ordering under many concurrent producers
//! - Slow rotation callbacks never stall the service loop
//! - Accounting stays exact when shutdown races with writers

use crossbeam_channel::bounded;
use rust_convention_logger::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    condition()
}

fn prefix(dir: &TempDir, stem: &str) -> String {
    dir.path().join(stem).display().to_string()
}

/// A full queue blocks the writer until the service loop makes room
#[test]
fn test_full_queue_blocks_writer() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(FileLogger::new(prefix(&temp_dir, "blocking"), ".log", 1).unwrap());

    logger.write(&[Value::text("first")]);
    assert_eq!(logger.queue_length(), 1);

    let (done_tx, done_rx) = bounded::<()>(1);
    let writer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            logger.write(&[Value::text("second")]);
            let _ = done_tx.send(());
        })
    };

    assert!(
        done_rx.recv_timeout(Duration::from_millis(200)).is_err(),
        "write returned while the queue was full"
    );
    assert_eq!(logger.queue_length(), 1);

    let service = logger.start().unwrap();
    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("Blocked writer was never released");
    writer.join().unwrap();

    assert!(wait_until(Duration::from_secs(5), || {
        logger.metrics().payloads_written() == 2
    }));
    service.shutdown().unwrap();

    let content = fs::read_to_string(temp_dir.path().join("blocking.log")).unwrap();
    assert_eq!(content, "first\nsecond\n");
    assert_eq!(logger.metrics().block_events(), 1);
}

/// Lines from one producer keep their order; no line is lost or duplicated
#[test]
fn test_many_producers_keep_their_order() {
    const PRODUCERS: usize = 8;
    const LINES_PER_PRODUCER: usize = 1000;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let logger = Arc::new(FileLogger::new(prefix(&temp_dir, "producers"), ".log", 64).unwrap());
    let service = logger.start().unwrap();

    let handles: Vec<_> = (0..PRODUCERS)
        .map(|producer| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for seq in 0..LINES_PER_PRODUCER {
                    logger.write(&[Value::display(&producer), Value::display(&seq)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let total = (PRODUCERS * LINES_PER_PRODUCER) as u64;
    assert!(wait_until(Duration::from_secs(10), || {
        logger.metrics().payloads_written() == total
    }));
    service.shutdown().unwrap();

    let content = fs::read_to_string(temp_dir.path().join("producers.log")).unwrap();
    let mut next_seq: HashMap<usize, usize> = HashMap::new();
    let mut lines = 0;
    for line in content.lines() {
        let mut parts = line.split(' ');
        let producer: usize = parts.next().unwrap().parse().unwrap();
        let seq: usize = parts.next().unwrap().parse().unwrap();
        assert!(parts.next().is_none(), "interleaved line: {:?}", line);

        let expected = next_seq.entry(producer).or_insert(0);
        assert_eq!(seq, *expected, "producer {} out of order", producer);
        *expected += 1;
        lines += 1;
    }
    assert_eq!(lines, PRODUCERS * LINES_PER_PRODUCER);
    assert!(next_seq.values().all(|&n| n == LINES_PER_PRODUCER));
}

/// Callbacks that never return do not keep the loop from writing
#[test]
fn test_slow_rotation_callbacks_do_not_stall_writes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (release_tx, release_rx) = bounded::<()>(0);

    let logger = Arc::new(
        FileLogger::builder(prefix(&temp_dir, "slow-callback"), ".log")
            .rotation_interval(Duration::from_millis(20))
            .on_rotation(Arc::new(move |_: &Path, _: &Path| {
                let _ = release_rx.recv();
            }))
            .build()
            .unwrap(),
    );
    let service = logger.start().unwrap();

    assert!(wait_until(Duration::from_secs(5), || {
        logger.pending_notifications() >= 2
    }));

    for i in 0..100_u32 {
        logger.write(&[Value::display(&i)]);
    }
    assert!(wait_until(Duration::from_secs(5), || {
        logger.metrics().payloads_written() == 100
    }));
    assert!(logger.metrics().rotations() >= 2);

    service.shutdown().unwrap();
    drop(release_tx);
    assert!(wait_until(Duration::from_secs(5), || {
        logger.pending_notifications() == 0
    }));
}

/// Capped notifications skip ticks instead of piling up threads
#[test]
fn test_notification_cap_under_load() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let (release_tx, release_rx) = bounded::<()>(0);

    let logger = Arc::new(
        FileLogger::builder(prefix(&temp_dir, "capped"), ".log")
            .rotation_interval(Duration::from_millis(10))
            .max_pending_notifications(2)
            .on_rotation(Arc::new(move |_: &Path, _: &Path| {
                let _ = release_rx.recv();
            }))
            .build()
            .unwrap(),
    );
    let service = logger.start().unwrap();

    assert!(wait_until(Duration::from_secs(5), || {
        logger.metrics().notifications_skipped() >= 3
    }));
    assert!(logger.pending_notifications() <= 2);
    assert_eq!(logger.metrics().notifications_dispatched(), 2);

    service.shutdown().unwrap();
    drop(release_tx);
    assert!(wait_until(Duration::from_secs(5), || {
        logger.pending_notifications() == 0
    }));
}

/// Every payload is either in the file or still queued after a racing shutdown
#[test]
fn test_shutdown_races_with_writer() {
    const LINES: usize = 2000;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    // Large enough that the writer never blocks once the loop is gone
    let logger = Arc::new(
        FileLogger::new(prefix(&temp_dir, "race"), ".log", LINES).unwrap(),
    );
    let service = logger.start().unwrap();

    let writer = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..LINES {
                logger.write(&[Value::display(&i)]);
            }
        })
    };

    assert!(wait_until(Duration::from_secs(5), || {
        logger.metrics().payloads_written() >= 100
    }));
    service.shutdown().unwrap();
    writer.join().unwrap();

    let metrics = logger.metrics();
    assert_eq!(metrics.payloads_enqueued(), LINES as u64);
    assert_eq!(
        metrics.payloads_written() + logger.queue_length() as u64,
        LINES as u64
    );

    let content = fs::read_to_string(temp_dir.path().join("race.log")).unwrap();
    let written: Vec<usize> = content.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(written.len() as u64, metrics.payloads_written());
    assert!(written.iter().enumerate().all(|(i, &n)| i == n));
}
