use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-wide count of image requests not yet in a terminal state.
///
/// Incremented exactly once when a request is enqueued and decremented
/// exactly once on every terminal transition (bound, failed, or
/// cancelled), so the count returning to zero means the import has fully
/// drained.
#[derive(Clone, Debug, Default)]
pub struct CompletionTracker {
    outstanding: Arc<AtomicUsize>,
}

impl CompletionTracker {
    /// Create a tracker with no outstanding requests.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly enqueued request.
    pub fn enqueue(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a terminal transition for a previously enqueued request.
    pub fn complete(&self) {
        let prev = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(prev > 0, "complete() without matching enqueue()");
    }

    /// Requests still in flight.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/images/track.rs"]
mod tests;
