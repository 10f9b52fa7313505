//! Core types for the record feed.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a record.
///
/// Opaque string; callers compare it but never parse it. Created records get
/// a random UUID, the keep-alive sentinel carries the empty string.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        RecordId(Uuid::new_v4().to_string())
    }

    /// The empty identifier carried by keep-alive sentinels.
    pub fn empty() -> Self {
        RecordId(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single record in the feed.
///
/// Immutable once created. Subscribers receive clones, never references into
/// the log, so nothing a subscriber does can touch stored history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Unique identifier (assigned by the log).
    pub id: RecordId,

    /// Caller-supplied title. May be empty; emptiness carries no meaning.
    pub title: String,

    /// Completion flag, always `false` at creation.
    pub completed: bool,
}

impl Record {
    /// The synthetic keep-alive sentinel: empty identifier, empty title.
    ///
    /// Streams emit it on idle intervals so consumers can tell a quiet feed
    /// from a dead one.
    pub fn keep_alive() -> Self {
        Record {
            id: RecordId::empty(),
            title: String::new(),
            completed: false,
        }
    }

    /// True only for the keep-alive sentinel.
    ///
    /// Created records always carry a generated identifier, so an empty title
    /// alone never makes a record look synthetic.
    pub fn is_keep_alive(&self) -> bool {
        self.id.is_empty() && self.title.is_empty()
    }
}
