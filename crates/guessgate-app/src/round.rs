//! Round controller.
//!
//! [`RoundController`] composes an [`InputGate`] with round semantics: a
//! results target, a round-end callback, and separate win/loss delays. It is
//! a two-level state machine: the gate's [`GateState`] nested inside a
//! [`RoundState`].
//!
//! # Round choreography
//!
//! For every accepted input event (see [`RoundController::play`]):
//! 1. Disable the gate.
//! 2. Classify the event.
//! 3. [`RoundOutcome::Continuing`]: enable again at once.
//! 4. [`RoundOutcome::Won`] / [`RoundOutcome::Lost`]: show the result and
//!    schedule the round-end callback after the matching delay. The gate stays
//!    suppressed until that callback re-enables it.

use std::{fmt, time::Duration};

use tracing::{debug, trace, warn};

use crate::{
    Delivery, ElementId, Gate, GateError, GateState, InputEvent, InputGate, Platform, RoundConfig,
    RoundEndHandler, RoundInputHandler, RoundMessages, TimerId, callback::Slot,
};

/// Result of classifying one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundOutcome {
    /// The round is still in progress.
    Continuing,
    /// The round ended in a win.
    Won,
    /// The round ended in a loss.
    Lost,
}

/// Where the controller is in the round cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundState {
    /// A round is in progress.
    #[default]
    Playing,
    /// A round ended; waiting for the round-end timer.
    AwaitingNextRound,
}

/// The round-end timer currently scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    /// Timer handle issued by the platform.
    pub id: TimerId,
    /// Delay it was scheduled with.
    pub delay: Duration,
    /// Outcome that ended the round.
    pub outcome: RoundOutcome,
}

/// Input gate with round semantics.
///
/// `P` is the platform type the callbacks receive.
pub struct RoundController<P> {
    gate: InputGate<RoundInputHandler<P>>,
    results: Option<ElementId>,
    win_delay: Duration,
    loss_delay: Duration,
    messages: RoundMessages,
    on_round_end: Slot<RoundEndHandler<P>>,
    round: RoundState,
    /// At most one; a round cannot end again before its timer fires.
    pending: Option<PendingTimer>,
}

impl<P> fmt::Debug for RoundController<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundController")
            .field("gate", &self.gate)
            .field("results", &self.results)
            .field("win_delay", &self.win_delay)
            .field("loss_delay", &self.loss_delay)
            .field("round", &self.round)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<P> Default for RoundController<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> RoundController<P> {
    /// Create an unconfigured controller with default delays and messages.
    pub fn new() -> Self {
        let defaults = RoundConfig::default();
        Self {
            gate: InputGate::with_config(defaults.gate),
            results: defaults.results,
            win_delay: defaults.win_delay,
            loss_delay: defaults.loss_delay,
            messages: defaults.messages,
            on_round_end: Slot::default(),
            round: RoundState::Playing,
            pending: None,
        }
    }

    /// Create a controller with the given configuration.
    pub fn with_config(config: RoundConfig) -> Self {
        let RoundConfig { gate, results, win_delay, loss_delay, messages } = config;
        Self {
            gate: InputGate::with_config(gate),
            results,
            win_delay,
            loss_delay,
            messages,
            ..Self::new()
        }
    }

    /// Store a new configuration. Touches no platform state.
    ///
    /// Rejected while the gate is listening.
    pub fn configure(&mut self, config: RoundConfig) -> Result<(), GateError> {
        let RoundConfig { gate, results, win_delay, loss_delay, messages } = config;
        self.gate.configure(gate)?;
        self.results = results;
        self.win_delay = win_delay;
        self.loss_delay = loss_delay;
        self.messages = messages;
        Ok(())
    }

    /// Set the input callback.
    pub fn set_on_input(&mut self, handler: RoundInputHandler<P>) {
        self.gate.set_on_input(handler);
    }

    /// Set the callback run when the round-end timer fires.
    pub fn set_on_round_end(&mut self, handler: RoundEndHandler<P>) {
        self.on_round_end.set(handler);
    }

    /// The embedded gate.
    pub fn gate(&self) -> &InputGate<RoundInputHandler<P>> {
        &self.gate
    }

    /// Current round state.
    pub fn round_state(&self) -> RoundState {
        self.round
    }

    /// Scheduled round-end timer, if a round just ended.
    pub fn pending_timer(&self) -> Option<PendingTimer> {
        self.pending
    }

    /// Delay before the next round after `outcome`. `None` for
    /// [`RoundOutcome::Continuing`].
    pub fn delay_for(&self, outcome: RoundOutcome) -> Option<Duration> {
        match outcome {
            RoundOutcome::Continuing => None,
            RoundOutcome::Won => Some(self.win_delay),
            RoundOutcome::Lost => Some(self.loss_delay),
        }
    }

    /// Input stays suppressed until the round-end timer fires.
    fn ensure_playing(&self, operation: &'static str) -> Result<(), GateError> {
        if self.round == RoundState::AwaitingNextRound {
            return Err(GateError::InvalidStateTransition { state: self.gate.state(), operation });
        }
        Ok(())
    }

    fn message_for(&self, outcome: RoundOutcome) -> Option<&str> {
        match outcome {
            RoundOutcome::Continuing => None,
            RoundOutcome::Won => Some(self.messages.won.as_str()),
            RoundOutcome::Lost => Some(self.messages.lost.as_str()),
        }
    }
}

impl<P: Platform> RoundController<P> {
    /// Offer an event raised on `target` to the controller.
    ///
    /// The input callback runs only while the gate is listening, and only for
    /// the configured surface and event kind.
    pub fn dispatch(
        &mut self,
        platform: &mut P,
        target: ElementId,
        event: &InputEvent,
    ) -> Result<Delivery, GateError> {
        if !self.gate.accepts(target, event) {
            trace!(
                "drop {} event on {} ({:?}, {:?})",
                event.kind,
                target,
                self.gate.state(),
                self.round
            );
            return Ok(Delivery::Dropped);
        }

        let Some(mut handler) = self.gate.take_handler() else {
            return Err(GateError::InvalidStateTransition {
                state: self.gate.state(),
                operation: "dispatch while the input handler is running",
            });
        };
        let result = handler.call(self, platform, event);
        self.gate.restore_handler(handler);
        result.map(|()| Delivery::Delivered)
    }

    /// Run the round choreography for one event.
    ///
    /// The gate is suppressed from before `classify` runs until it is either
    /// re-enabled or the round-end timer is scheduled, so no second event can
    /// be observed mid-classification.
    pub fn play<F>(
        &mut self,
        platform: &mut P,
        event: &InputEvent,
        classify: F,
    ) -> Result<RoundOutcome, GateError>
    where
        F: FnOnce(&InputEvent) -> RoundOutcome,
    {
        self.disable(platform)?;

        let outcome = classify(event);
        debug!("classified {:?} as {:?}", event.data(), outcome);

        match outcome {
            RoundOutcome::Continuing => self.enable(platform)?,
            RoundOutcome::Won | RoundOutcome::Lost => {
                self.finish_round(platform, outcome)?;
            },
        }
        Ok(outcome)
    }

    /// End the round: show the result and schedule the round-end timer.
    ///
    /// Requires a suppressed gate and no pending timer.
    pub fn finish_round(
        &mut self,
        platform: &mut P,
        outcome: RoundOutcome,
    ) -> Result<TimerId, GateError> {
        let (Some(delay), Some(message)) = (self.delay_for(outcome), self.message_for(outcome))
        else {
            return Err(GateError::InvalidStateTransition {
                state: self.gate.state(),
                operation: "finish a round that is still in progress",
            });
        };
        if self.gate.is_listening() {
            return Err(GateError::InvalidStateTransition {
                state: GateState::Listening,
                operation: "finish a round while listening",
            });
        }
        if self.pending.is_some() {
            return Err(GateError::InvalidStateTransition {
                state: self.gate.state(),
                operation: "finish a round while awaiting the next one",
            });
        }
        let results = self.results.ok_or(GateError::Configuration { missing: "results target" })?;
        if !self.on_round_end.is_set() {
            return Err(GateError::Configuration { missing: "round-end callback" });
        }

        platform.set_text(results, message);
        let id = platform.schedule_once(delay);
        debug!("round {:?}; next round in {}ms on {}", outcome, delay.as_millis(), id);

        self.pending = Some(PendingTimer { id, delay, outcome });
        self.round = RoundState::AwaitingNextRound;
        Ok(id)
    }

    /// Handle expiry of a timer.
    ///
    /// Only the pending round-end timer counts: it moves the controller back
    /// to [`RoundState::Playing`] and runs the round-end callback. Returns
    /// `false` for any other timer.
    pub fn timer_fired(&mut self, platform: &mut P, timer: TimerId) -> Result<bool, GateError> {
        match self.pending {
            Some(pending) if pending.id == timer => {},
            _ => {
                warn!("ignoring unexpected {}", timer);
                return Ok(false);
            },
        }

        let Some(mut handler) = self.on_round_end.take() else {
            return Err(GateError::Configuration { missing: "round-end callback" });
        };
        debug!("{} fired; starting next round", timer);
        self.pending = None;
        self.round = RoundState::Playing;

        let result = handler.call(self, platform);
        self.on_round_end.restore(handler);
        result.map(|()| true)
    }

    /// Clear the results target.
    pub fn clear_results(&mut self, platform: &mut P) -> Result<(), GateError> {
        let results = self.results.ok_or(GateError::Configuration { missing: "results target" })?;
        platform.set_text(results, "");
        Ok(())
    }
}

impl<P> Gate for RoundController<P> {
    fn state(&self) -> GateState {
        self.gate.state()
    }

    fn hides_on_disable(&self) -> bool {
        self.gate.hides_on_disable()
    }

    fn ensure_ready(&self) -> Result<(), GateError> {
        self.ensure_playing("enable while awaiting the next round")?;
        self.gate.ensure_ready()?;
        if self.results.is_none() {
            return Err(GateError::Configuration { missing: "results target" });
        }
        if !self.on_round_end.is_set() {
            return Err(GateError::Configuration { missing: "round-end callback" });
        }
        Ok(())
    }

    fn enable_view<Q: Platform + ?Sized>(&mut self, platform: &mut Q) -> Result<(), GateError> {
        self.gate.enable_view(platform)
    }

    fn disable_view<Q: Platform + ?Sized>(&mut self, platform: &mut Q) -> Result<(), GateError> {
        self.gate.disable_view(platform)
    }

    fn enable_listener<Q: Platform + ?Sized>(
        &mut self,
        platform: &mut Q,
    ) -> Result<(), GateError> {
        self.ensure_playing("listen while awaiting the next round")?;
        self.gate.enable_listener(platform)
    }

    fn disable_listener<Q: Platform + ?Sized>(
        &mut self,
        platform: &mut Q,
    ) -> Result<(), GateError> {
        self.gate.disable_listener(platform)
    }
}
