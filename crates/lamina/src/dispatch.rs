//! Tap dispatch state machine.
//!
//! A tap on a row moves the sheet through `Idle → Tapped`, then either back
//! to `Idle` (stay-open rows) or through `Dismissing → Dismissed → Idle`
//! (dismiss rows, where the selection callback fires from the
//! dismissal-completion continuation). Taps are serialized by the host's
//! event source; at most one tap-driven transition is in flight at a time,
//! and the dispatcher refuses taps that arrive while one is.
//!
//! There is no cancelling state: a dismissal, once initiated, always runs to
//! completion.

use std::sync::Arc;

use parking_lot::Mutex;

/// Where a tap-driven transition currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    /// No tap in flight.
    #[default]
    Idle,
    /// A tap was received and is being dispatched.
    Tapped,
    /// The tap initiated a dismissal that has not finished yet.
    Dismissing,
    /// The dismissal finished; the deferred callback is firing.
    Dismissed,
}

/// Tracks the tap lifecycle for one sheet.
///
/// Cloning shares the underlying state, so a dismissal-completion
/// continuation can settle the machine after the sheet call stack unwound.
#[derive(Clone, Default)]
pub(crate) struct TapDispatcher {
    state: Arc<Mutex<DispatchState>>,
}

impl TapDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DispatchState {
        *self.state.lock()
    }

    /// Enter `Tapped`. Returns `false` when another tap-driven transition is
    /// still in flight, in which case the new tap must be ignored.
    pub fn begin_tap(&self) -> bool {
        let mut state = self.state.lock();
        if *state != DispatchState::Idle {
            tracing::warn!(
                target: "lamina::dispatch",
                state = ?*state,
                "tap ignored while another tap-driven transition is in flight"
            );
            return false;
        }
        *state = DispatchState::Tapped;
        tracing::trace!(target: "lamina::dispatch", "idle -> tapped");
        true
    }

    /// Settle a stay-open tap: `Tapped → Idle`.
    pub fn settle(&self) {
        let mut state = self.state.lock();
        tracing::trace!(target: "lamina::dispatch", from = ?*state, "-> idle");
        *state = DispatchState::Idle;
    }

    /// A dismiss-behavior tap initiated dismissal: `Tapped → Dismissing`.
    pub fn begin_dismissal(&self) {
        let mut state = self.state.lock();
        tracing::trace!(target: "lamina::dispatch", from = ?*state, "-> dismissing");
        *state = DispatchState::Dismissing;
    }

    /// The dismissal completed. Passes through `Dismissed` while the caller
    /// runs the deferred callback, then returns a guard that resets to
    /// `Idle` when dropped.
    pub fn dismissal_finished(&self) -> DispatchGuard {
        let mut state = self.state.lock();
        tracing::trace!(target: "lamina::dispatch", from = ?*state, "-> dismissed");
        *state = DispatchState::Dismissed;
        DispatchGuard {
            state: self.state.clone(),
        }
    }
}

/// Resets the dispatcher to `Idle` when dropped.
pub(crate) struct DispatchGuard {
    state: Arc<Mutex<DispatchState>>,
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        tracing::trace!(target: "lamina::dispatch", from = ?*state, "-> idle");
        *state = DispatchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stay_path_round_trips_through_tapped() {
        let dispatcher = TapDispatcher::new();
        assert_eq!(dispatcher.state(), DispatchState::Idle);

        assert!(dispatcher.begin_tap());
        assert_eq!(dispatcher.state(), DispatchState::Tapped);

        dispatcher.settle();
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn test_dismiss_path_settles_via_guard() {
        let dispatcher = TapDispatcher::new();
        assert!(dispatcher.begin_tap());
        dispatcher.begin_dismissal();
        assert_eq!(dispatcher.state(), DispatchState::Dismissing);

        let guard = dispatcher.dismissal_finished();
        assert_eq!(dispatcher.state(), DispatchState::Dismissed);

        drop(guard);
        assert_eq!(dispatcher.state(), DispatchState::Idle);
    }

    #[test]
    fn test_second_tap_rejected_while_dismissing() {
        let dispatcher = TapDispatcher::new();
        assert!(dispatcher.begin_tap());
        dispatcher.begin_dismissal();

        assert!(!dispatcher.begin_tap());
        assert_eq!(dispatcher.state(), DispatchState::Dismissing);
    }

    #[test]
    fn test_clones_share_state() {
        let dispatcher = TapDispatcher::new();
        let shared = dispatcher.clone();

        assert!(dispatcher.begin_tap());
        assert_eq!(shared.state(), DispatchState::Tapped);
    }
}
