//! # Drawer State
//!
//! The cash-drawer session of the current till, if one has been opened.
//! A closed session stays here (for the end-of-shift summary) until the next
//! one is opened.

use std::sync::{Mutex, PoisonError};

use till_core::drawer::DrawerSession;

#[derive(Debug, Default)]
pub struct DrawerState {
    session: Mutex<Option<DrawerSession>>,
}

impl DrawerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the drawer session slot.
    pub fn with_drawer<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Option<&DrawerSession>) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(session.as_ref())
    }

    /// Executes a function with write access to the drawer session slot.
    pub fn with_drawer_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Option<DrawerSession>) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }
}
