//! `LineQueue`: The lossy hand-off between the reader and the frame loop.
//!
//! A bounded crossbeam channel where the producer never waits. When the
//! channel is full, the producer evicts the oldest unread line itself and
//! retries, so under a sustained burst the queue holds the most recent
//! `capacity` lines and older ones are dropped.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters shared by every handle of one queue.
#[derive(Debug, Default)]
struct QueueStats {
    pushed: AtomicU64,
    evicted: AtomicU64,
}

/// Fixed-capacity, overwrite-oldest line queue.
///
/// Cloning yields another handle to the same queue. The intended use is
/// one handle in the reader thread calling [`push`](Self::push) and one
/// in the frame loop calling [`try_pop`](Self::try_pop).
#[derive(Debug, Clone)]
pub struct LineQueue {
    tx: Sender<String>,
    rx: Receiver<String>,
    capacity: usize,
    stats: Arc<QueueStats>,
}

impl LineQueue {
    /// Create a queue holding at most `capacity` lines (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = bounded(capacity);
        Self {
            tx,
            rx,
            capacity,
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Enqueue a line. Never blocks and never fails.
    ///
    /// If the queue is full, the oldest unread line is discarded.
    pub fn push(&self, line: String) {
        self.stats.pushed.fetch_add(1, Ordering::Relaxed);
        let mut line = line;
        loop {
            match self.tx.try_send(line) {
                Ok(()) => return,
                Err(TrySendError::Full(rejected)) => {
                    // The consumer may have drained in the meantime, in
                    // which case there is nothing to evict and the retry
                    // simply succeeds.
                    if self.rx.try_recv().is_ok() {
                        let evicted = self.stats.evicted.fetch_add(1, Ordering::Relaxed) + 1;
                        log::debug!("line queue full, evicted oldest line ({evicted} so far)");
                    }
                    line = rejected;
                }
                // Both ends live in `self`, so this cannot happen
                Err(TrySendError::Disconnected(_)) => return,
            }
        }
    }

    /// Dequeue the oldest line, or `None` if the queue is empty.
    pub fn try_pop(&self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Iterate over every line currently queued, oldest first.
    ///
    /// Stops as soon as the queue is empty, so it never waits for the reader.
    pub fn drain(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::from_fn(|| self.try_pop())
    }

    /// Number of lines waiting.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Check if no lines are waiting.
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Maximum number of lines held.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total lines ever pushed.
    pub fn pushed(&self) -> u64 {
        self.stats.pushed.load(Ordering::Relaxed)
    }

    /// Total lines evicted by overflow.
    pub fn evicted(&self) -> u64 {
        self.stats.evicted.load(Ordering::Relaxed)
    }
}
