//! Standard invariant checks.
//!
//! These capture what must be true of a gate after every event, whatever the
//! keystroke sequence.

use guessgate_app::{GateState, RoundState};

use super::{GateSnapshot, Invariant, InvariantKind, InvariantResult, Violation};

/// At most one listener may be registered on the surface.
pub struct SingleListener;

impl Invariant for SingleListener {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SingleListener
    }

    fn check(&self, state: &GateSnapshot) -> InvariantResult {
        if state.listeners > 1 {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("{} listeners registered", state.listeners),
            });
        }
        Ok(())
    }
}

/// A listening gate has exactly one listener registered; a suppressed gate
/// has none.
///
/// A mismatch means events can either reach a gate that believes itself
/// suppressed, or be lost by a gate that believes itself listening.
pub struct ListenerMatchesState;

impl Invariant for ListenerMatchesState {
    fn kind(&self) -> InvariantKind {
        InvariantKind::ListenerMatchesState
    }

    fn check(&self, state: &GateSnapshot) -> InvariantResult {
        let expected = usize::from(state.gate == GateState::Listening);
        if state.listeners != expected {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("gate {:?} with {} listeners", state.gate, state.listeners),
            });
        }
        Ok(())
    }
}

/// Between rounds the gate is suppressed, and hidden if configured to hide.
pub struct SuppressedWhileAwaiting;

impl Invariant for SuppressedWhileAwaiting {
    fn kind(&self) -> InvariantKind {
        InvariantKind::SuppressedWhileAwaiting
    }

    fn check(&self, state: &GateSnapshot) -> InvariantResult {
        if state.round != RoundState::AwaitingNextRound {
            return Ok(());
        }
        if state.gate == GateState::Listening {
            return Err(Violation {
                invariant: self.kind(),
                message: "listening while awaiting next round".into(),
            });
        }
        if state.hide_on_disable && state.surface_visible {
            return Err(Violation {
                invariant: self.kind(),
                message: "surface visible while awaiting next round".into(),
            });
        }
        Ok(())
    }
}

/// A single round-end timer is pending exactly while awaiting the next round.
pub struct PendingTimerMatchesRound;

impl Invariant for PendingTimerMatchesRound {
    fn kind(&self) -> InvariantKind {
        InvariantKind::PendingTimerMatchesRound
    }

    fn check(&self, state: &GateSnapshot) -> InvariantResult {
        let awaiting = state.round == RoundState::AwaitingNextRound;
        if state.pending_timer != awaiting {
            return Err(Violation {
                invariant: self.kind(),
                message: format!(
                    "round {:?} with pending timer {}",
                    state.round, state.pending_timer
                ),
            });
        }
        if state.scheduled_timers > 1 {
            return Err(Violation {
                invariant: self.kind(),
                message: format!("{} timers scheduled", state.scheduled_timers),
            });
        }
        Ok(())
    }
}
