//! Scaling tests for the feed with synthetic high-volume histories.
//!
//! Covers the behaviors that only show up with volume:
//! - Create throughput with many live sessions attached
//! - Subscribe + full replay over a deep backlog
//! - Writer progress against saturated, never-drained sessions

use herald::{Feed, FeedConfig};
use std::time::{Duration, Instant};

const RECORD_COUNT: usize = 50_000;

/// Timing helper
struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    fn new(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn report(&self) {
        println!("  {} took {:.2}ms", self.name, self.elapsed_ms());
    }

    fn report_with_count(&self, count: usize) {
        let ms = self.elapsed_ms();
        let per_sec = if ms > 0.0 {
            count as f64 / (ms / 1000.0)
        } else {
            0.0
        };
        println!(
            "  {} took {:.2}ms ({} items, {:.0} items/sec)",
            self.name, ms, count, per_sec
        );
    }
}

fn scaling_feed(channel_capacity: usize) -> Feed {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Feed::with_config(FeedConfig {
        channel_capacity,
        keep_alive: Duration::from_secs(30),
    })
    .unwrap()
}

// =============================================================================
// Test: Deep backlog, single late subscriber
// =============================================================================

#[test]
fn test_scaling_deep_backlog_replay() {
    println!("\n=== 50k Records, Late Subscriber ===");

    let feed = scaling_feed(16);

    let timer = Timer::new("Create 50k records");
    for i in 0..RECORD_COUNT {
        feed.create(format!("record {}", i));
    }
    timer.report_with_count(RECORD_COUNT);

    let timer = Timer::new("Subscribe (snapshot + register)");
    let mut stream = feed.subscribe();
    timer.report();
    assert_eq!(stream.backlog_len(), RECORD_COUNT);

    let timer = Timer::new("Replay full backlog");
    let mut replayed = 0;
    for record in (&mut stream).take(RECORD_COUNT) {
        assert!(!record.is_keep_alive());
        replayed += 1;
    }
    timer.report_with_count(replayed);
    assert_eq!(replayed, RECORD_COUNT);
}

// =============================================================================
// Test: Fan-out to many sessions
// =============================================================================

#[test]
fn test_scaling_fanout_to_many_sessions() {
    println!("\n=== 200 Records, 100 Sessions ===");

    const SESSIONS: usize = 100;
    const BURST: usize = 200;

    let feed = scaling_feed(256);

    let timer = Timer::new("Open 100 sessions");
    let mut streams: Vec<_> = (0..SESSIONS).map(|_| feed.subscribe()).collect();
    timer.report();
    assert_eq!(feed.session_count(), SESSIONS);

    let timer = Timer::new("Create 200 records across 100 sessions");
    for i in 0..BURST {
        feed.create(format!("burst {}", i));
    }
    timer.report_with_count(BURST);

    let stats = feed.stats();
    assert_eq!(stats.published, BURST as u64);
    assert_eq!(stats.dropped, 0);

    let canonical = feed.records();
    let timer = Timer::new("Drain all sessions");
    for stream in &mut streams {
        let got: Vec<_> = stream.take(BURST).collect();
        assert_eq!(got, canonical);
    }
    timer.report_with_count(SESSIONS * BURST);

    drop(streams);
    assert_eq!(feed.session_count(), 0);
}

// =============================================================================
// Test: Writer progress against saturated sessions
// =============================================================================

#[test]
fn test_scaling_writer_with_saturated_sessions() {
    println!("\n=== 10k Records, 50 Saturated Sessions ===");

    const SESSIONS: usize = 50;
    const CAPACITY: usize = 10;
    const CREATES: usize = 10_000;

    let feed = scaling_feed(CAPACITY);
    let mut streams: Vec<_> = (0..SESSIONS).map(|_| feed.subscribe()).collect();

    // Nobody drains; every channel saturates after the first ten records.
    let timer = Timer::new("Create 10k records against saturated sessions");
    for i in 0..CREATES {
        feed.create(format!("record {}", i));
    }
    timer.report_with_count(CREATES);

    let stats = feed.stats();
    assert_eq!(stats.record_count, CREATES);
    assert_eq!(stats.published, CREATES as u64);
    assert_eq!(
        stats.dropped,
        (SESSIONS * (CREATES - CAPACITY)) as u64,
        "each saturated session drops everything past its capacity"
    );
    assert_eq!(feed.session_count(), SESSIONS);

    // Saturated sessions still hold the oldest records, in order.
    let head: Vec<_> = streams[0].by_ref().take(CAPACITY).collect();
    assert_eq!(head, feed.records()[..CAPACITY].to_vec());
}
