//! Transition detection between consecutive polls.

use super::snapshot::{ConnectivityEvent, ConnectivityState};

/// Remembers the last observed connection status and reports changes.
///
/// The first observation only records the status. After that, an event is
/// produced only when the status flips, so two `Lost` (or two `Restored`)
/// can never be reported back-to-back.
#[derive(Debug, Clone, Default)]
pub struct TransitionTracker {
    previous: Option<bool>,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a poll result and return the transition it caused, if any.
    pub fn observe(&mut self, is_connected: bool) -> Option<ConnectivityEvent> {
        let previous = self.previous.replace(is_connected)?;
        match (previous, is_connected) {
            (false, true) => Some(ConnectivityEvent::Restored),
            (true, false) => Some(ConnectivityEvent::Lost),
            _ => None,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.previous
            .map(ConnectivityState::from_connected)
            .unwrap_or_default()
    }
}
