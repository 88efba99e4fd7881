//! Cancellation handles for scheduled timers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to a scheduled timer. Clones share the same timer.
#[derive(Debug, Clone, Default)]
pub struct TimerHandle {
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the timer. Idempotent; a cancelled timer never runs again.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
