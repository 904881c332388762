//! Bounded FIFO queue shared by the crawler and the indexer.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender, bounded};

use crate::types::PipelineError;
use crate::utils::config::CANCEL_POLL_INTERVAL;

/// One queue slot: a real work item, or the shutdown pill that tells the
/// indexer no more items will follow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message<T> {
    Item(T),
    Shutdown,
}

/// Capacity-limited strict-FIFO queue with blocking, cancellable `put`/`take`.
///
/// Both channel halves live here, so neither side ever observes a premature
/// disconnect while the queue is shared. Blocking calls poll the caller's
/// cancel flag every [`CANCEL_POLL_INTERVAL`].
pub struct BoundedQueue<T> {
    tx: Sender<Message<T>>,
    rx: Receiver<Message<T>>,
    shutdown_sent: AtomicBool,
}

impl<T> BoundedQueue<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be at least 1");
        let (tx, rx) = bounded(capacity);
        BoundedQueue {
            tx,
            rx,
            shutdown_sent: AtomicBool::new(false),
        }
    }

    /// Insert at the tail, blocking while the queue is full. Returns
    /// `Err(Cancelled)` without inserting if `cancel` is set while blocked.
    pub fn put(&self, item: T, cancel: &AtomicBool) -> Result<(), PipelineError> {
        assert!(
            !self.shutdown_sent.load(Ordering::Relaxed),
            "put after the shutdown pill"
        );
        let mut msg = Message::Item(item);
        loop {
            if cancel.load(Ordering::Relaxed) {
                return Err(PipelineError::Cancelled);
            }
            match self.tx.send_timeout(msg, CANCEL_POLL_INTERVAL) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(m)) => msg = m,
                Err(SendTimeoutError::Disconnected(_)) => return Err(PipelineError::Closed),
            }
        }
    }

    /// Remove and return the head, blocking while empty. Returns
    /// `Err(Cancelled)` if `cancel` is set while blocked.
    pub fn take(&self, cancel: &AtomicBool) -> Result<Message<T>, PipelineError> {
        loop {
            if cancel.load(Ordering::Relaxed) {
                return Err(PipelineError::Cancelled);
            }
            match self.rx.recv_timeout(CANCEL_POLL_INTERVAL) {
                Ok(msg) => return Ok(msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return Err(PipelineError::Closed),
            }
        }
    }

    /// Enqueue the shutdown pill. Blocks until space is available and is
    /// deliberately NOT cancellable: the pill must reach the queue on every
    /// exit path or the indexer would wait forever. Panics on a second call;
    /// one pill per run is an invariant, not a recoverable condition.
    pub fn put_shutdown(&self) {
        let already = self.shutdown_sent.swap(true, Ordering::Relaxed);
        assert!(!already, "shutdown pill enqueued twice");
        // The channel cannot disconnect while self holds both halves.
        let _ = self.tx.send(Message::Shutdown);
    }

    /// Entries currently held (items + pill).
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.tx.capacity().unwrap_or(0)
    }
}
