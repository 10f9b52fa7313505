//! Per-session record streams.

use crate::types::Record;
use crossbeam_channel::{bounded, select, Receiver, Sender};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use super::registry::{SessionId, SessionRegistry};

/// Handle for stopping a stream from outside its consuming thread.
///
/// Cheap to clone and safe to trigger from anywhere; the transport typically
/// fires it when the client disconnects or its deadline expires. Triggering
/// more than once, or after the stream already ended, is harmless.
#[derive(Clone)]
pub struct Canceller {
    sender: Sender<()>,
}

impl Canceller {
    /// Signal the stream to stop. Never blocks.
    pub fn cancel(&self) {
        let _ = self.sender.try_send(());
    }
}

/// What one live-phase wait produced.
enum Step {
    Live(Record),
    KeepAlive,
    Cancelled,
    Disconnected,
}

/// Blocking record stream for one subscriber session.
///
/// Yields the backlog captured at subscription time first, then live records
/// as they are created, with keep-alive sentinels whenever the configured
/// idle interval passes without traffic. The iterator ends (`None`) once the
/// session is cancelled or the feed is dropped; either way the session is
/// unregistered before exhaustion is reported.
pub struct RecordStream {
    id: SessionId,
    registry: Arc<SessionRegistry>,

    /// Snapshot records still awaiting replay.
    backlog: VecDeque<Record>,

    /// Receiving half of the session's delivery channel.
    delivery: Receiver<Record>,

    cancel_rx: Receiver<()>,

    /// Held so the cancel channel stays open while no `Canceller` is around.
    cancel_tx: Sender<()>,

    keep_alive: Duration,
    finished: bool,
}

impl RecordStream {
    pub(crate) fn new(
        id: SessionId,
        registry: Arc<SessionRegistry>,
        backlog: Vec<Record>,
        delivery: Receiver<Record>,
        keep_alive: Duration,
    ) -> Self {
        let (cancel_tx, cancel_rx) = bounded(1);
        debug!(session = %id, backlog = backlog.len(), "Stream opened");
        Self {
            id,
            registry,
            backlog: backlog.into(),
            delivery,
            cancel_rx,
            cancel_tx,
            keep_alive,
            finished: false,
        }
    }

    /// Identifier of the session behind this stream.
    pub fn session_id(&self) -> SessionId {
        self.id
    }

    /// Handle that stops this stream when triggered.
    pub fn canceller(&self) -> Canceller {
        Canceller {
            sender: self.cancel_tx.clone(),
        }
    }

    /// Snapshot records not yet replayed.
    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Unregister the session and mark the stream exhausted. Idempotent.
    fn close(&mut self, reason: &'static str) {
        if !self.finished {
            self.finished = true;
            self.registry.remove(self.id);
            debug!(session = %self.id, reason, "Stream closed");
        }
    }
}

impl Iterator for RecordStream {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.finished {
            return None;
        }

        // Cancellation wins over anything still queued, even mid-replay.
        if self.cancel_rx.try_recv().is_ok() {
            self.close("cancelled");
            return None;
        }

        // Replay phase: the whole snapshot goes out before any live record.
        if let Some(record) = self.backlog.pop_front() {
            trace!(session = %self.id, record = %record.id, "Replaying record");
            return Some(record);
        }

        // Live phase: wait on delivery, cancellation, or the idle timer,
        // whichever fires first.
        let step = {
            let delivery = &self.delivery;
            let cancel = &self.cancel_rx;
            select! {
                recv(cancel) -> _ => Step::Cancelled,
                recv(delivery) -> msg => match msg {
                    Ok(record) => Step::Live(record),
                    Err(_) => Step::Disconnected,
                },
                default(self.keep_alive) => Step::KeepAlive,
            }
        };

        match step {
            Step::Live(record) => {
                trace!(session = %self.id, record = %record.id, "Live record");
                Some(record)
            }
            Step::KeepAlive => {
                trace!(session = %self.id, "Keep-alive");
                Some(Record::keep_alive())
            }
            Step::Cancelled => {
                self.close("cancelled");
                None
            }
            Step::Disconnected => {
                self.close("feed closed");
                None
            }
        }
    }
}

impl Drop for RecordStream {
    fn drop(&mut self) {
        self.close("dropped");
    }
}
