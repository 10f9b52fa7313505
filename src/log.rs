//! Append-only record log.

use crate::types::{Record, RecordId};
use parking_lot::RwLock;

/// Append-only, in-memory record log.
///
/// Holds every record created since the feed was constructed, in creation
/// order. Records are never mutated or removed, so the log only grows; history
/// lives exactly as long as the process does.
#[derive(Default)]
pub struct RecordLog {
    /// All records, in creation order.
    records: RwLock<Vec<Record>>,
}

impl RecordLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new record built from `title`.
    ///
    /// Assigns a fresh identifier, stores the record, and returns a clone of
    /// what was stored.
    pub fn append(&self, title: impl Into<String>) -> Record {
        let record = Record {
            id: RecordId::generate(),
            title: title.into(),
            completed: false,
        };
        self.records.write().push(record.clone());
        record
    }

    /// The full history at the time of the call, in creation order.
    ///
    /// Returns owned clones; appends that land after the snapshot is taken
    /// are not reflected in it.
    pub fn snapshot(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    /// Number of records appended so far.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True if nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
