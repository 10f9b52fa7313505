//! Session registry and record fan-out.

use crate::types::Record;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

/// Unique identifier for a subscriber session.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry of active subscriber sessions.
///
/// Each session owns a bounded delivery channel; the registry holds the
/// sending halves and fans records out with non-blocking sends. A session
/// whose channel is full simply misses that record, so one slow subscriber
/// never stalls the writer or the other sessions.
pub struct SessionRegistry {
    /// Active sessions by id.
    sessions: RwLock<HashMap<SessionId, Sender<Record>>>,

    /// Counter for generating session ids.
    next_id: AtomicU64,

    /// Capacity of each session's delivery channel.
    capacity: usize,

    /// Fan-out invocations (one per created record).
    published: AtomicU64,

    /// Deliveries skipped because a session's channel was full.
    dropped: AtomicU64,
}

impl SessionRegistry {
    /// Create a registry whose sessions buffer up to `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            capacity,
            published: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Register a new session.
    ///
    /// Returns the session id and the receiving half of its delivery channel.
    /// The channel takes part in every fan-out from this point on; records
    /// queue in it until the session drains them.
    pub fn register(&self) -> (SessionId, Receiver<Record>) {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(self.capacity);
        self.sessions.write().insert(id, sender);
        debug!(session = %id, "Session registered");
        (id, receiver)
    }

    /// Remove a session, dropping the sending half of its channel.
    ///
    /// Idempotent: removing an unknown or already-removed id is a no-op.
    /// Returns whether the session was still registered.
    pub fn remove(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().remove(&id).is_some();
        if removed {
            debug!(session = %id, "Session removed");
        }
        removed
    }

    /// Deliver a record to every registered session.
    ///
    /// Never blocks. A full channel drops the record for that session only; a
    /// disconnected channel marks the session for pruning.
    pub fn fan_out(&self, record: &Record) {
        self.published.fetch_add(1, Ordering::Relaxed);

        let mut stale = Vec::new();
        {
            let sessions = self.sessions.read();
            for (id, sender) in sessions.iter() {
                match sender.try_send(record.clone()) {
                    Ok(()) => {
                        trace!(session = %id, record = %record.id, "Record queued for delivery");
                    }
                    Err(TrySendError::Full(_)) => {
                        self.dropped.fetch_add(1, Ordering::Relaxed);
                        debug!(
                            session = %id,
                            record = %record.id,
                            "Delivery channel full, record dropped"
                        );
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        stale.push(*id);
                    }
                }
            }
        }

        // Prune sessions whose receiving half is gone (stream dropped before
        // its removal landed).
        if !stale.is_empty() {
            let mut sessions = self.sessions.write();
            for id in stale {
                if sessions.remove(&id).is_some() {
                    debug!(session = %id, "Pruned disconnected session");
                }
            }
        }
    }

    /// Drop every session's sender, disconnecting all attached streams.
    pub fn clear(&self) {
        let mut sessions = self.sessions.write();
        if !sessions.is_empty() {
            debug!(sessions = sessions.len(), "Registry cleared");
        }
        sessions.clear();
    }

    /// Number of registered sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Fan-out invocations so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Deliveries skipped due to full session channels.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;

    fn make_record(title: &str) -> Record {
        Record {
            id: RecordId::generate(),
            title: title.to_string(),
            completed: false,
        }
    }

    #[test]
    fn test_register_and_remove() {
        let registry = SessionRegistry::new(10);

        let (id, _receiver) = registry.register();
        assert_eq!(registry.session_count(), 1);

        assert!(registry.remove(id));
        assert_eq!(registry.session_count(), 0);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = SessionRegistry::new(10);

        let (id, _receiver) = registry.register();
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(!registry.remove(SessionId(999)));
    }

    #[test]
    fn test_fan_out_reaches_all_sessions() {
        let registry = SessionRegistry::new(10);

        let (_, rx_a) = registry.register();
        let (_, rx_b) = registry.register();

        let record = make_record("hello");
        registry.fan_out(&record);

        assert_eq!(rx_a.try_recv().unwrap(), record);
        assert_eq!(rx_b.try_recv().unwrap(), record);
    }

    #[test]
    fn test_full_channel_drops_newest() {
        let registry = SessionRegistry::new(1);
        let (_, receiver) = registry.register();

        let first = make_record("first");
        registry.fan_out(&first);
        registry.fan_out(&make_record("second"));
        registry.fan_out(&make_record("third"));

        // The oldest queued record survives; later ones were dropped.
        assert_eq!(receiver.try_recv().unwrap(), first);
        assert!(receiver.try_recv().is_err());
        assert_eq!(registry.dropped(), 2);
        assert_eq!(registry.published(), 3);

        // Session stays registered through the overflow.
        assert_eq!(registry.session_count(), 1);
    }

    #[test]
    fn test_fan_out_prunes_disconnected_sessions() {
        let registry = SessionRegistry::new(10);

        let (_, receiver) = registry.register();
        drop(receiver);
        assert_eq!(registry.session_count(), 1);

        registry.fan_out(&make_record("ping"));
        assert_eq!(registry.session_count(), 0);
    }

    #[test]
    fn test_clear_disconnects_receivers() {
        let registry = SessionRegistry::new(10);
        let (_, receiver) = registry.register();

        registry.clear();
        assert_eq!(registry.session_count(), 0);
        assert!(receiver.recv().is_err());
    }
}
