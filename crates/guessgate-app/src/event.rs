//! Input and host events.
//!
//! [`InputEvent`] is what a keystroke looks like to a gate handler.
//! [`HostEvent`] is everything a [`crate::Driver`] can deliver to the
//! [`crate::Runtime`]: keystrokes and timer expiries are the only two
//! suspension points of the system.

use std::fmt;

use crate::{ElementId, TimerId};

/// Name of the UI event a gate listens for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKind(String);

impl EventKind {
    /// Create an event kind from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Event kind name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventKind {
    fn default() -> Self {
        Self::new("input")
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A single input event raised by an input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    /// Which kind of event this is.
    pub kind: EventKind,
    /// Inserted text. `None` for events that insert nothing (deletions).
    pub data: Option<String>,
}

impl InputEvent {
    /// Create an event of the given kind.
    pub fn new(kind: EventKind, data: Option<String>) -> Self {
        Self { kind, data }
    }

    /// Default-kind (`"input"`) event inserting `data`.
    pub fn input(data: impl Into<String>) -> Self {
        Self::new(EventKind::default(), Some(data.into()))
    }

    /// Inserted text, if any.
    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }
}

/// Events delivered by a [`crate::Driver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// An input event raised on an element.
    Input {
        /// Element that raised the event.
        target: ElementId,
        /// The event itself.
        event: InputEvent,
    },

    /// A timer scheduled through [`crate::Platform::schedule_once`] expired.
    TimerFired(TimerId),

    /// The host is shutting down.
    Quit,
}
