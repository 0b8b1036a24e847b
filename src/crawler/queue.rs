//! src/crawler/queue.rs
//!
//! Thread-safe FIFO of pending URLs. The queue is filled once at startup
//! and only ever drained after that; an empty pop is the termination
//! signal for a worker, so there is no blocking wait and no re-insertion.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Mutex-guarded work queue. The critical section is a single
/// `pop_front`, so contention between workers stays negligible.
pub struct WorkQueue {
    inner: Mutex<VecDeque<String>>,
}

impl WorkQueue {
    /// Build the queue from the fully loaded URL list, preserving file order.
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            inner: Mutex::new(VecDeque::from(urls)),
        }
    }

    /// Remove and return the head URL, or `None` when the queue is drained.
    pub fn try_pop(&self) -> Option<String> {
        self.inner.lock().unwrap().pop_front()
    }

    /// Current number of pending URLs (sampled by the stats reporter).
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
