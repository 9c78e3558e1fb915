//! Input gating for turn-based guessing games
//!
//! While the game model is being updated in response to a keystroke, further
//! keyboard input must be ignored and the input surface should show it. This
//! crate holds the small state machines that govern that, decoupled from any
//! concrete UI so the same code runs against a browser, a terminal, or the
//! deterministic simulation in `guessgate-harness`.
//!
//! # Components
//!
//! - [`InputGate`]: enable/disable lifecycle of one input surface
//! - [`RoundController`]: round semantics (results, win/loss delays) composed
//!   over an [`InputGate`]
//! - [`Gate`]: capability trait shared by both
//! - [`Platform`]: host UI and timer operations the gates delegate to
//! - [`Driver`]: trait for platform-specific event delivery
//! - [`Runtime`]: generic single-threaded event loop using a Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod callback;
mod config;
mod driver;
mod error;
mod event;
mod gate;
mod platform;
mod round;
mod runtime;

pub use callback::{InputHandler, RoundEndHandler, RoundInputHandler};
pub use config::{GateConfig, RoundConfig, RoundMessages};
pub use driver::Driver;
pub use error::{GateError, RuntimeError};
pub use event::{EventKind, HostEvent, InputEvent};
pub use gate::{Delivery, Gate, GateState, InputGate};
pub use platform::{ElementId, Platform, TimerId};
pub use round::{PendingTimer, RoundController, RoundOutcome, RoundState};
pub use runtime::{RunSummary, Runtime};

#[cfg(test)]
pub(crate) mod testing;
