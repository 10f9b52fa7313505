//! # Herald
//!
//! An append-only in-memory record log with live fan-out to streaming
//! subscribers.
//!
//! ## Core Concepts
//!
//! - **Records**: Immutable entries with a generated id, a title, and a
//!   completion flag
//! - **Feed**: The service object combining the log and the session registry;
//!   construct once, share across threads
//! - **Streams**: Per-subscriber blocking iterators that replay history, then
//!   follow live records, with keep-alive sentinels across idle stretches
//!
//! ## Example
//!
//! ```
//! use herald::Feed;
//!
//! let feed = Feed::new();
//! feed.create("first");
//!
//! let mut stream = feed.subscribe();
//! let canceller = stream.canceller();
//!
//! // History replays before any live record.
//! let record = stream.next().unwrap();
//! assert_eq!(record.title, "first");
//!
//! canceller.cancel();
//! assert!(stream.next().is_none());
//! ```

pub mod error;
pub mod feed;
pub mod log;
pub mod sessions;
pub mod types;

// Re-exports
pub use error::{FeedError, Result};
pub use feed::{Feed, FeedConfig, FeedStats};
pub use log::RecordLog;
pub use sessions::{Canceller, RecordStream, SessionId, SessionRegistry};
pub use types::{Record, RecordId};
