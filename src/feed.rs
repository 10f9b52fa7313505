//! Main Feed struct tying the log and sessions together.

use crate::error::{FeedError, Result};
use crate::log::RecordLog;
use crate::sessions::{RecordStream, SessionRegistry};
use crate::types::Record;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, trace};

/// Feed configuration.
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// Capacity of each session's delivery channel.
    pub channel_capacity: usize,

    /// Idle interval after which a stream yields a keep-alive sentinel.
    pub keep_alive: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 10,
            keep_alive: Duration::from_secs(30),
        }
    }
}

/// Point-in-time feed counters.
#[derive(Clone, Debug, Default)]
pub struct FeedStats {
    /// Records created so far.
    pub record_count: usize,

    /// Currently registered sessions.
    pub session_count: usize,

    /// Fan-out invocations (one per created record).
    pub published: u64,

    /// Deliveries skipped because a session's channel was full.
    pub dropped: u64,
}

/// The live record feed.
///
/// Owns the append-only log and the session registry. Construct one at
/// process start and share it between the write path and the streaming
/// consumers (wrap in `Arc` to hand it across threads). Dropping the feed
/// disconnects every live stream.
pub struct Feed {
    /// Append-only record history.
    log: RecordLog,

    /// Active subscriber sessions (shared with each stream for cleanup).
    registry: Arc<SessionRegistry>,

    /// Idle interval for keep-alive sentinels.
    keep_alive: Duration,

    /// Lock serializing create against subscribe, so a snapshot and the
    /// registration behind it observe the same history.
    write_lock: Mutex<()>,
}

impl Feed {
    /// Create a feed with the default configuration.
    pub fn new() -> Self {
        Self::build(FeedConfig::default())
    }

    /// Create a feed with a custom configuration.
    ///
    /// Rejects a zero channel capacity (fan-out sends would always fail) and
    /// a zero keep-alive interval (idle streams would spin on sentinels).
    pub fn with_config(config: FeedConfig) -> Result<Self> {
        if config.channel_capacity == 0 {
            return Err(FeedError::InvalidConfig(
                "channel capacity must be at least 1".into(),
            ));
        }
        if config.keep_alive.is_zero() {
            return Err(FeedError::InvalidConfig(
                "keep-alive interval must be non-zero".into(),
            ));
        }
        Ok(Self::build(config))
    }

    fn build(config: FeedConfig) -> Self {
        info!(
            channel_capacity = config.channel_capacity,
            keep_alive = ?config.keep_alive,
            "Feed initialized"
        );
        Self {
            log: RecordLog::new(),
            registry: Arc::new(SessionRegistry::new(config.channel_capacity)),
            keep_alive: config.keep_alive,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a record and fan it out to every live session.
    ///
    /// Appends to the log, then delivers to all registered channels with
    /// non-blocking sends. A full or abandoned session channel never stalls
    /// this call.
    pub fn create(&self, title: impl Into<String>) -> Record {
        let _lock = self.write_lock.lock();

        let record = self.log.append(title);
        trace!(record = %record.id, "Record created");
        self.registry.fan_out(&record);
        record
    }

    /// Open a new subscriber session and return its stream.
    ///
    /// The history snapshot and the session registration happen under one
    /// lock, so every record lands either in the stream's backlog or in its
    /// delivery channel, never both and never neither.
    pub fn subscribe(&self) -> RecordStream {
        let _lock = self.write_lock.lock();

        let backlog = self.log.snapshot();
        let (id, delivery) = self.registry.register();
        RecordStream::new(
            id,
            Arc::clone(&self.registry),
            backlog,
            delivery,
            self.keep_alive,
        )
    }

    /// Full record history at the time of the call, in creation order.
    pub fn records(&self) -> Vec<Record> {
        self.log.snapshot()
    }

    /// Number of records created so far.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// True if no record has been created yet.
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.registry.session_count()
    }

    /// Current feed counters.
    pub fn stats(&self) -> FeedStats {
        FeedStats {
            record_count: self.log.len(),
            session_count: self.registry.session_count(),
            published: self.registry.published(),
            dropped: self.registry.dropped(),
        }
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Feed {
    fn drop(&mut self) {
        // Disconnect every live stream; their iterators end on the closed
        // channel.
        self.registry.clear();
    }
}
