//! Host-supplied callbacks.
//!
//! Handlers receive the gate or controller that runs them, so they can
//! disable and re-enable it while handling an event. To make that possible the
//! owner moves the handler out of its [`Slot`] for the duration of the call
//! and puts it back afterwards.

use std::fmt;

use crate::{Gate, GateError, InputEvent, InputGate, Platform, RoundController, RoundOutcome};

/// Input callback of a standalone [`InputGate`].
pub struct InputHandler<P>(
    Box<dyn FnMut(&mut InputGate<InputHandler<P>>, &mut P, &InputEvent) -> Result<(), GateError>>,
);

impl<P> InputHandler<P> {
    /// Wrap a closure as a gate input handler.
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&mut InputGate<Self>, &mut P, &InputEvent) -> Result<(), GateError> + 'static,
    {
        Self(Box::new(handler))
    }

    pub(crate) fn call(
        &mut self,
        gate: &mut InputGate<Self>,
        platform: &mut P,
        event: &InputEvent,
    ) -> Result<(), GateError> {
        (self.0)(gate, platform, event)
    }
}

impl<P> fmt::Debug for InputHandler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InputHandler(..)")
    }
}

/// Input callback of a [`RoundController`].
pub struct RoundInputHandler<P>(
    Box<dyn FnMut(&mut RoundController<P>, &mut P, &InputEvent) -> Result<(), GateError>>,
);

impl<P> RoundInputHandler<P> {
    /// Wrap a closure as a round input handler.
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&mut RoundController<P>, &mut P, &InputEvent) -> Result<(), GateError> + 'static,
    {
        Self(Box::new(handler))
    }

    pub(crate) fn call(
        &mut self,
        controller: &mut RoundController<P>,
        platform: &mut P,
        event: &InputEvent,
    ) -> Result<(), GateError> {
        (self.0)(controller, platform, event)
    }
}

impl<P: Platform> RoundInputHandler<P> {
    /// Handler running the standard round choreography with `classifier`.
    ///
    /// See [`RoundController::play`].
    pub fn classifying<C>(mut classifier: C) -> Self
    where
        C: FnMut(&InputEvent) -> RoundOutcome + 'static,
    {
        Self::new(move |controller, platform, event| {
            controller.play(platform, event, &mut classifier).map(|_| ())
        })
    }
}

impl<P> fmt::Debug for RoundInputHandler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RoundInputHandler(..)")
    }
}

/// Callback run when the round-end timer fires.
pub struct RoundEndHandler<P>(
    Box<dyn FnMut(&mut RoundController<P>, &mut P) -> Result<(), GateError>>,
);

impl<P> RoundEndHandler<P> {
    /// Wrap a closure as a round-end handler.
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&mut RoundController<P>, &mut P) -> Result<(), GateError> + 'static,
    {
        Self(Box::new(handler))
    }

    pub(crate) fn call(
        &mut self,
        controller: &mut RoundController<P>,
        platform: &mut P,
    ) -> Result<(), GateError> {
        (self.0)(controller, platform)
    }
}

impl<P: Platform> RoundEndHandler<P> {
    /// Clear the results target and enable input for the next round.
    pub fn restart() -> Self {
        Self::new(|controller, platform| {
            controller.clear_results(platform)?;
            controller.enable(platform)
        })
    }
}

impl<P> fmt::Debug for RoundEndHandler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RoundEndHandler(..)")
    }
}

/// Storage for a handler that may be running.
#[derive(Debug)]
pub(crate) enum Slot<H> {
    Empty,
    Ready(H),
    /// Moved out for the duration of a call. Counts as set.
    Running,
}

impl<H> Default for Slot<H> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<H> Slot<H> {
    pub(crate) fn is_set(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    pub(crate) fn set(&mut self, handler: H) {
        *self = Self::Ready(handler);
    }

    /// Move the handler out. `None` if empty or already running.
    pub(crate) fn take(&mut self) -> Option<H> {
        match std::mem::replace(self, Self::Running) {
            Self::Ready(handler) => Some(handler),
            other => {
                *self = other;
                None
            },
        }
    }

    /// Put a handler back after a call, unless it was replaced meanwhile.
    pub(crate) fn restore(&mut self, handler: H) {
        if matches!(self, Self::Running) {
            *self = Self::Ready(handler);
        }
    }
}
