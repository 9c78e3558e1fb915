//! Host UI capabilities.
//!
//! The gates never own UI elements. They refer to them through opaque
//! [`ElementId`] handles and ask the [`Platform`] to act on them, so the
//! element lifetimes stay with the host.

use std::{fmt, time::Duration};

use crate::EventKind;

/// Opaque handle to a host UI element (input field, form, text display).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a one-shot timer issued by [`Platform::schedule_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer {}", self.0)
    }
}

/// UI and timer operations a gate delegates to.
///
/// All methods are infallible from the gate's point of view: failures of the
/// underlying platform are the host's concern and surface through
/// [`Driver::poll_event`](crate::Driver::poll_event) if at all.
///
/// Listener registration is by `(element, kind)`. The platform delivers
/// events back as [`HostEvent::Input`](crate::HostEvent::Input); the gate that
/// registered decides whether to run its handler.
pub trait Platform {
    /// Show or hide an element. Does not change focus.
    fn set_visible(&mut self, element: ElementId, visible: bool);

    /// Whether the element is currently visible.
    fn is_visible(&self, element: ElementId) -> bool;

    /// Move keyboard focus to the element.
    fn focus(&mut self, element: ElementId);

    /// Register a listener for `kind` events on the element.
    fn add_listener(&mut self, element: ElementId, kind: &EventKind);

    /// Unregister a listener for `kind` events on the element.
    ///
    /// Removing a listener that is not registered is a no-op.
    fn remove_listener(&mut self, element: ElementId, kind: &EventKind);

    /// Clear transient content of a resettable group (e.g. a form).
    fn reset(&mut self, element: ElementId);

    /// Replace the displayed text of an element.
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Schedule a one-shot timer.
    ///
    /// The platform reports expiry as
    /// [`HostEvent::TimerFired`](crate::HostEvent::TimerFired). There is no
    /// cancellation; once scheduled the timer fires.
    fn schedule_once(&mut self, delay: Duration) -> TimerId;
}
