//! Admission window counter
//!
//! [`WindowCounter`] holds the number of submissions currently counted
//! against the quota. The count only changes under a single mutex, and every
//! change wakes the tasks parked in [`WindowCounter::changed`] so they can
//! re-check whether a slot is free.
//!
//! The counter itself has no notion of time. The submitter drives
//! [`WindowCounter::reset`] from a periodic task.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{futures::Notified, Notify};

/// Mutable state protected by the counter's mutex.
#[derive(Debug, Default)]
struct WindowState {
    /// Admissions counted against the current window
    admitted: u32,
    /// Once set, no further admissions are granted
    closed: bool,
}

/// Shared admission count for one quota window
#[derive(Debug, Default)]
pub struct WindowCounter {
    state: Mutex<WindowState>,
    changed: Notify,
}

impl WindowCounter {
    /// Creates an open counter with no admissions.
    pub fn new() -> Self {
        Self::default()
    }

    // The state is two plain fields that are always consistent, so a panic
    // in another holder leaves nothing to repair.
    fn lock(&self) -> MutexGuard<'_, WindowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the number of admissions currently counted.
    pub fn count(&self) -> u32 {
        self.lock().admitted
    }

    /// Admits one submission if fewer than `limit` are counted.
    ///
    /// Returns `false` without changing anything when the window is full or
    /// the counter has been closed.
    pub fn try_increment(&self, limit: u32) -> bool {
        {
            let mut state = self.lock();
            if state.closed || state.admitted >= limit {
                return false;
            }
            state.admitted += 1;
        }
        self.changed.notify_waiters();
        true
    }

    /// Releases one admission and returns the count left. The count never
    /// drops below zero.
    pub fn decrement(&self) -> u32 {
        let remaining = {
            let mut state = self.lock();
            state.admitted = state.admitted.saturating_sub(1);
            state.admitted
        };
        self.changed.notify_waiters();
        remaining
    }

    /// Sets the count to zero, whatever its previous value.
    ///
    /// Admissions still in flight are forgiven; their later
    /// [`decrement`](Self::decrement) saturates at zero. Returns the value
    /// that was discarded.
    pub fn reset(&self) -> u32 {
        let discarded = std::mem::take(&mut self.lock().admitted);
        self.changed.notify_waiters();
        discarded
    }

    /// Stops granting admissions and wakes every waiter.
    pub fn close(&self) {
        self.lock().closed = true;
        self.changed.notify_waiters();
    }

    /// Returns true once [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Future that completes on the next change to the counter.
    ///
    /// Only changes made after the future is polled or
    /// [enabled](Notified::enable) are observed, so a waiter must enable it
    /// before checking the count.
    pub fn changed(&self) -> Notified<'_> {
        self.changed.notified()
    }
}
