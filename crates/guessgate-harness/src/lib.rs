//! Deterministic simulation harness for guessgate.
//!
//! [`SimPlatform`] implements the [`guessgate_app::Platform`] and
//! [`guessgate_app::Driver`] traits over virtual elements and a virtual clock,
//! so the production [`guessgate_app::Runtime`] can be driven by scripted
//! keystrokes with reproducible timing.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties of the gate after
//! every processed event. Use [`InvariantRegistry::standard()`] for the
//! listener, visibility and timer invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classifier;
pub mod invariants;
pub mod scenario;
pub mod sim_platform;

pub use classifier::LetterCounter;
pub use invariants::{
    GateSnapshot, Invariant, InvariantKind, InvariantRegistry, InvariantResult,
    ListenerMatchesState, PendingTimerMatchesRound, SingleListener, SuppressedWhileAwaiting,
    Violation,
};
pub use sim_platform::{ScriptedInput, SimElement, SimError, SimPlatform};
