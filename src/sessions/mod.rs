//! Subscriber sessions for live feed updates.
//!
//! A session is one active streaming consumer: a bounded delivery channel
//! registered for fan-out, plus the `RecordStream` the consumer drives on its
//! own thread. Streams replay the backlog captured at subscription time, then
//! follow live records, emitting keep-alive sentinels across idle intervals.
//!
//! Session lifecycle:
//! - Registration hands out the delivery channel and participates in every
//!   subsequent fan-out
//! - Cancellation (via `Canceller`) or dropping the stream unregisters the
//!   session promptly
//! - Unregistering twice is a no-op
//!
//! # Example
//!
//! ```ignore
//! let mut stream = feed.subscribe();
//! let canceller = stream.canceller();
//!
//! // Drive on the connection thread
//! for record in &mut stream {
//!     if record.is_keep_alive() {
//!         continue;
//!     }
//!     println!("Got record: {:?}", record);
//! }
//! ```

mod registry;
mod stream;

pub use registry::{SessionId, SessionRegistry};
pub use stream::{Canceller, RecordStream};
