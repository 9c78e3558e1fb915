//! Driver trait for abstracting event delivery.
//!
//! The [`Driver`] trait decouples the [`crate::Runtime`] from where events
//! come from. A browser binding, a terminal frontend and the deterministic
//! simulation each implement it; the runtime's gating logic is shared.

use std::{fmt::Debug, ops::Sub, time::Duration};

use crate::{HostEvent, Platform};

/// Platform that also delivers events.
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): Platform-specific error type
/// - [`Instant`](Driver::Instant): Time representation (real or virtual)
pub trait Driver: Platform {
    /// Platform-specific error type.
    type Error: std::error::Error + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Debug + Sub<Output = Duration>;

    /// Wait for the next event.
    ///
    /// Only keystrokes on elements with a registered listener and expired
    /// timers are reported. Returns `None` once no event can ever arrive.
    fn poll_event(&mut self) -> Result<Option<HostEvent>, Self::Error>;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Release platform resources.
    fn stop(&mut self);
}
