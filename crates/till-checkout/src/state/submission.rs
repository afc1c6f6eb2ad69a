//! # Submission State
//!
//! The "submitting" busy flag. While a sale is in flight the submit control
//! is disabled; this is the same flag on the Rust side. It is advisory: it
//! stops double submission, it does not lock the cart.

use std::sync::atomic::{AtomicBool, Ordering};

/// Busy flag for sale submission.
#[derive(Debug, Default)]
pub struct SubmissionState {
    in_flight: AtomicBool,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a submission as started.
    ///
    /// Returns `None` if one is already in flight. The flag is released when
    /// the guard drops, whatever the outcome.
    pub fn try_begin(&self) -> Option<SubmissionGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SubmissionGuard { state: self })
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Releases the busy flag on drop.
#[derive(Debug)]
pub struct SubmissionGuard<'a> {
    state: &'a SubmissionState,
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.state.in_flight.store(false, Ordering::Release);
    }
}
