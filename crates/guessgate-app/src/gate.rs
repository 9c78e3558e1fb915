//! Input gate state machine.
//!
//! An [`InputGate`] decides whether input events raised on one surface reach
//! application logic. It has two states, [`GateState::Listening`] and
//! [`GateState::Suppressed`], and moves between them only through the
//! [`Gate`] operations.
//!
//! # Ordering
//!
//! `enable` restores the view before registering the listener; `disable`
//! removes the listener before hiding the view. An event can therefore never
//! reach the handler while the surface is hidden.

use tracing::{debug, trace};

use crate::{
    ElementId, GateConfig, GateError, InputEvent, InputHandler, Platform, callback::Slot,
};

/// Whether a gate delivers input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GateState {
    /// Events are not delivered. Initial state, before the first enable.
    #[default]
    Suppressed,
    /// Events are delivered to the input handler.
    Listening,
}

/// What happened to an event offered to a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The input handler ran.
    Delivered,
    /// The gate was suppressed, or the event was not for this gate.
    Dropped,
}

/// Enable/disable capability shared by [`InputGate`] and
/// [`crate::RoundController`].
///
/// Implementors provide the four sub-operations; the composite
/// [`enable`](Gate::enable) and [`disable`](Gate::disable) are built from them
/// so every gate follows the same ordering. The sub-operations stay public so
/// a host can, for example, re-enable only the listener of a gate that never
/// hides its surface.
pub trait Gate {
    /// Current gate state.
    fn state(&self) -> GateState;

    /// Whether `disable` hides the surface (and `enable` restores it).
    fn hides_on_disable(&self) -> bool;

    /// Check that every handle and callback `enable` needs is set.
    fn ensure_ready(&self) -> Result<(), GateError>;

    /// Make the surface visible, optionally focus it, and reset its container.
    fn enable_view<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), GateError>;

    /// Hide the surface. Focus is left alone.
    fn disable_view<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), GateError>;

    /// Register the input listener. No-op while already listening.
    fn enable_listener<P: Platform + ?Sized>(&mut self, platform: &mut P)
    -> Result<(), GateError>;

    /// Remove the input listener. No-op while already suppressed.
    fn disable_listener<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), GateError>;

    /// Whether the gate is [`GateState::Listening`].
    fn is_listening(&self) -> bool {
        self.state() == GateState::Listening
    }

    /// Transition to [`GateState::Listening`].
    ///
    /// Readiness is checked before any platform call, so a failed enable
    /// leaves the view untouched.
    fn enable<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), GateError> {
        self.ensure_ready()?;
        if self.hides_on_disable() {
            self.enable_view(platform)?;
        }
        self.enable_listener(platform)
    }

    /// Transition to [`GateState::Suppressed`].
    ///
    /// Calling it twice leaves the same observable state as calling it once.
    fn disable<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), GateError> {
        self.disable_listener(platform)?;
        if self.hides_on_disable() {
            self.disable_view(platform)?;
        }
        Ok(())
    }
}

/// Enable/disable lifecycle of a single input surface.
///
/// `H` is the input handler type. Standalone gates use [`InputHandler`] and
/// deliver events with [`InputGate::dispatch`]; a
/// [`crate::RoundController`] embeds a gate with its own handler type.
#[derive(Debug)]
pub struct InputGate<H> {
    config: GateConfig,
    on_input: Slot<H>,
    state: GateState,
}

impl<H> Default for InputGate<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> InputGate<H> {
    /// Create an unconfigured, suppressed gate.
    pub fn new() -> Self {
        Self {
            config: GateConfig::default(),
            on_input: Slot::default(),
            state: GateState::Suppressed,
        }
    }

    /// Create a suppressed gate with the given configuration.
    pub fn with_config(config: GateConfig) -> Self {
        Self { config, ..Self::new() }
    }

    /// Store a new configuration. Touches no platform state.
    ///
    /// Rejected while listening: the registered listener would be left behind
    /// on the old surface.
    pub fn configure(&mut self, config: GateConfig) -> Result<(), GateError> {
        if self.state == GateState::Listening {
            return Err(GateError::InvalidStateTransition {
                state: self.state,
                operation: "reconfigure",
            });
        }
        debug!("configure gate: {:?}", config);
        self.config = config;
        Ok(())
    }

    /// Current configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Set the input handler.
    pub fn set_on_input(&mut self, handler: H) {
        self.on_input.set(handler);
    }

    /// Whether an input handler has been set.
    pub fn has_input_handler(&self) -> bool {
        self.on_input.is_set()
    }

    /// Whether an event raised on `target` would reach the handler now.
    pub fn accepts(&self, target: ElementId, event: &InputEvent) -> bool {
        self.state == GateState::Listening
            && self.config.surface == Some(target)
            && event.kind == self.config.event_kind
    }

    /// Detach the listener and forget the surface and container handles.
    ///
    /// Afterwards `enable` fails with a configuration error and `disable`
    /// with an invalid state transition until the gate is reconfigured.
    pub fn teardown<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), GateError> {
        if self.config.surface.is_some() {
            self.disable_listener(platform)?;
        }
        debug!("tear down gate");
        self.config.surface = None;
        self.config.container = None;
        Ok(())
    }

    pub(crate) fn take_handler(&mut self) -> Option<H> {
        self.on_input.take()
    }

    pub(crate) fn restore_handler(&mut self, handler: H) {
        self.on_input.restore(handler);
    }

    /// Surface for a teardown-side operation.
    fn attached_surface(&self, operation: &'static str) -> Result<ElementId, GateError> {
        self.config
            .surface
            .ok_or(GateError::InvalidStateTransition { state: self.state, operation })
    }
}

impl<P> InputGate<InputHandler<P>> {
    /// Offer an event raised on `target` to the gate.
    ///
    /// The handler runs only while listening, and only for the configured
    /// surface and event kind. The handler receives the gate itself so it can
    /// disable input while it works.
    pub fn dispatch(
        &mut self,
        platform: &mut P,
        target: ElementId,
        event: &InputEvent,
    ) -> Result<Delivery, GateError> {
        if !self.accepts(target, event) {
            trace!("drop {} event on {} ({:?})", event.kind, target, self.state);
            return Ok(Delivery::Dropped);
        }

        let Some(mut handler) = self.take_handler() else {
            return Err(GateError::InvalidStateTransition {
                state: self.state,
                operation: "dispatch while the input handler is running",
            });
        };
        let result = handler.call(self, platform, event);
        self.restore_handler(handler);
        result.map(|()| Delivery::Delivered)
    }
}

impl<H> Gate for InputGate<H> {
    fn state(&self) -> GateState {
        self.state
    }

    fn hides_on_disable(&self) -> bool {
        self.config.hide_on_disable
    }

    fn ensure_ready(&self) -> Result<(), GateError> {
        if self.config.surface.is_none() {
            return Err(GateError::Configuration { missing: "surface" });
        }
        if self.config.container.is_none() {
            return Err(GateError::Configuration { missing: "container" });
        }
        if !self.on_input.is_set() {
            return Err(GateError::Configuration { missing: "input callback" });
        }
        Ok(())
    }

    fn enable_view<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), GateError> {
        let surface = self.config.surface.ok_or(GateError::Configuration { missing: "surface" })?;
        let container =
            self.config.container.ok_or(GateError::Configuration { missing: "container" })?;

        debug!("enable input view on {}", surface);
        platform.set_visible(surface, true);
        if self.config.refocus_on_enable {
            platform.focus(surface);
        }
        platform.reset(container);
        Ok(())
    }

    fn disable_view<P: Platform + ?Sized>(&mut self, platform: &mut P) -> Result<(), GateError> {
        let surface = self.attached_surface("disable input view")?;

        debug!("disable input view on {}", surface);
        platform.set_visible(surface, false);
        Ok(())
    }

    fn enable_listener<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), GateError> {
        let surface = self.config.surface.ok_or(GateError::Configuration { missing: "surface" })?;
        if !self.on_input.is_set() {
            return Err(GateError::Configuration { missing: "input callback" });
        }
        if self.state == GateState::Listening {
            trace!("input listener on {} already registered", surface);
            return Ok(());
        }

        debug!("enable {} listener on {}", self.config.event_kind, surface);
        platform.add_listener(surface, &self.config.event_kind);
        self.state = GateState::Listening;
        Ok(())
    }

    fn disable_listener<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
    ) -> Result<(), GateError> {
        let surface = self.attached_surface("disable input listener")?;
        if self.state == GateState::Suppressed {
            trace!("input listener on {} already removed", surface);
            return Ok(());
        }

        debug!("disable {} listener on {}", self.config.event_kind, surface);
        platform.remove_listener(surface, &self.config.event_kind);
        self.state = GateState::Suppressed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::testing::{FORM, RecordingPlatform, SURFACE};

    type TestGate = InputGate<InputHandler<RecordingPlatform>>;

    fn counting_gate(config: GateConfig) -> (TestGate, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let mut gate = InputGate::with_config(config);
        gate.set_on_input(InputHandler::new(move |_, _, _| {
            seen.set(seen.get() + 1);
            Ok(())
        }));
        (gate, calls)
    }

    #[test]
    fn enable_restores_view_before_listening() {
        let mut platform = RecordingPlatform::default();
        let (mut gate, _) = counting_gate(GateConfig::new(SURFACE, FORM));

        gate.enable(&mut platform).unwrap();

        assert_eq!(platform.take_ops(), ["show #2", "focus #2", "reset #1", "listen #2 input"]);
        assert!(gate.is_listening());
        assert_eq!(platform.focused, Some(SURFACE));
    }

    #[test]
    fn disable_removes_listener_before_hiding() {
        let mut platform = RecordingPlatform::default();
        let (mut gate, _) = counting_gate(GateConfig::new(SURFACE, FORM));
        gate.enable(&mut platform).unwrap();
        platform.take_ops();

        gate.disable(&mut platform).unwrap();

        assert_eq!(platform.take_ops(), ["unlisten #2 input", "hide #2"]);
        assert_eq!(gate.state(), GateState::Suppressed);
        assert!(!platform.is_visible(SURFACE));
    }

    #[test]
    fn enable_twice_registers_one_listener() {
        let mut platform = RecordingPlatform::default();
        let (mut gate, _) = counting_gate(GateConfig::new(SURFACE, FORM));

        gate.enable(&mut platform).unwrap();
        gate.enable(&mut platform).unwrap();

        assert_eq!(platform.listener_count(SURFACE, "input"), 1);
    }

    #[test]
    fn disable_twice_matches_disable_once() {
        let mut platform = RecordingPlatform::default();
        let (mut gate, _) = counting_gate(GateConfig::new(SURFACE, FORM));
        gate.enable(&mut platform).unwrap();

        gate.disable(&mut platform).unwrap();
        let once =
            (gate.state(), platform.is_visible(SURFACE), platform.listener_count(SURFACE, "input"));
        gate.disable(&mut platform).unwrap();
        let twice =
            (gate.state(), platform.is_visible(SURFACE), platform.listener_count(SURFACE, "input"));

        assert_eq!(once, twice);
        assert_eq!(once, (GateState::Suppressed, false, 0));
    }

    #[test]
    fn keep_visible_gate_only_toggles_listener() {
        let mut platform = RecordingPlatform::default();
        let config = GateConfig::new(SURFACE, FORM).with_hide_on_disable(false);
        let (mut gate, _) = counting_gate(config);

        gate.enable(&mut platform).unwrap();
        gate.disable(&mut platform).unwrap();

        assert_eq!(platform.take_ops(), ["listen #2 input", "unlisten #2 input"]);
    }

    #[test]
    fn enable_view_without_refocus_keeps_focus() {
        let mut platform = RecordingPlatform::default();
        let config = GateConfig::new(SURFACE, FORM).with_refocus_on_enable(false);
        let (mut gate, _) = counting_gate(config);

        gate.enable_view(&mut platform).unwrap();

        assert_eq!(platform.take_ops(), ["show #2", "reset #1"]);
        assert_eq!(platform.focused, None);
        assert!(!gate.is_listening());
    }

    #[test]
    fn missing_handles_fail_before_touching_platform() {
        let mut platform = RecordingPlatform::default();
        let (mut gate, _) = counting_gate(GateConfig::default());

        let err = gate.enable(&mut platform).unwrap_err();

        assert_eq!(err, GateError::Configuration { missing: "surface" });
        assert!(platform.ops.is_empty());

        let config = GateConfig { surface: Some(SURFACE), ..GateConfig::default() };
        gate.configure(config).unwrap();
        let err = gate.enable(&mut platform).unwrap_err();
        assert_eq!(err, GateError::Configuration { missing: "container" });
        assert!(platform.ops.is_empty());
    }

    #[test]
    fn missing_handler_is_configuration_error() {
        let mut platform = RecordingPlatform::default();
        let mut gate: TestGate = InputGate::with_config(GateConfig::new(SURFACE, FORM));

        assert_eq!(
            gate.enable(&mut platform),
            Err(GateError::Configuration { missing: "input callback" })
        );
        assert_eq!(
            gate.enable_listener(&mut platform),
            Err(GateError::Configuration { missing: "input callback" })
        );
        assert!(platform.ops.is_empty());
    }

    #[test]
    fn suppressed_gate_drops_events() {
        let mut platform = RecordingPlatform::default();
        let (mut gate, calls) = counting_gate(GateConfig::new(SURFACE, FORM));
        let event = InputEvent::input("a");

        assert_eq!(gate.dispatch(&mut platform, SURFACE, &event), Ok(Delivery::Dropped));

        gate.enable(&mut platform).unwrap();
        assert_eq!(gate.dispatch(&mut platform, SURFACE, &event), Ok(Delivery::Delivered));

        gate.disable(&mut platform).unwrap();
        assert_eq!(gate.dispatch(&mut platform, SURFACE, &event), Ok(Delivery::Dropped));

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn events_for_other_targets_or_kinds_are_dropped() {
        let mut platform = RecordingPlatform::default();
        let (mut gate, calls) = counting_gate(GateConfig::new(SURFACE, FORM));
        gate.enable(&mut platform).unwrap();

        let keyup = InputEvent::new("keyup".into(), Some("a".into()));
        assert_eq!(gate.dispatch(&mut platform, SURFACE, &keyup), Ok(Delivery::Dropped));
        assert_eq!(
            gate.dispatch(&mut platform, FORM, &InputEvent::input("a")),
            Ok(Delivery::Dropped)
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn handler_can_cycle_its_own_gate() {
        let mut platform = RecordingPlatform::default();
        let mut gate: TestGate = InputGate::with_config(GateConfig::new(SURFACE, FORM));
        gate.set_on_input(InputHandler::new(|gate, platform, _| {
            gate.disable(platform)?;
            gate.enable(platform)
        }));
        gate.enable(&mut platform).unwrap();
        platform.take_ops();

        let delivery = gate.dispatch(&mut platform, SURFACE, &InputEvent::input("x")).unwrap();

        assert_eq!(delivery, Delivery::Delivered);
        assert!(gate.is_listening());
        assert!(gate.has_input_handler());
        assert_eq!(platform.listener_count(SURFACE, "input"), 1);
        assert_eq!(platform.take_ops(), [
            "unlisten #2 input",
            "hide #2",
            "show #2",
            "focus #2",
            "reset #1",
            "listen #2 input"
        ]);
    }

    #[test]
    fn reentrant_dispatch_is_rejected() {
        let mut platform = RecordingPlatform::default();
        let mut gate: TestGate = InputGate::with_config(GateConfig::new(SURFACE, FORM));
        gate.set_on_input(InputHandler::new(|gate, platform, event| {
            gate.dispatch(platform, SURFACE, event).map(|_| ())
        }));
        gate.enable(&mut platform).unwrap();

        let err = gate.dispatch(&mut platform, SURFACE, &InputEvent::input("x")).unwrap_err();

        assert!(matches!(err, GateError::InvalidStateTransition { .. }));
        assert!(gate.has_input_handler());
    }

    #[test]
    fn configure_is_rejected_while_listening() {
        let mut platform = RecordingPlatform::default();
        let (mut gate, _) = counting_gate(GateConfig::new(SURFACE, FORM));
        gate.enable(&mut platform).unwrap();

        let err = gate.configure(GateConfig::default()).unwrap_err();

        assert_eq!(err, GateError::InvalidStateTransition {
            state: GateState::Listening,
            operation: "reconfigure"
        });
        assert_eq!(gate.config().surface, Some(SURFACE));
    }

    #[test]
    fn torn_down_gate_cannot_transition() {
        let mut platform = RecordingPlatform::default();
        let (mut gate, _) = counting_gate(GateConfig::new(SURFACE, FORM));
        gate.enable(&mut platform).unwrap();

        gate.teardown(&mut platform).unwrap();

        assert_eq!(platform.listener_count(SURFACE, "input"), 0);
        assert!(matches!(
            gate.disable(&mut platform),
            Err(GateError::InvalidStateTransition { state: GateState::Suppressed, .. })
        ));
        assert_eq!(
            gate.enable(&mut platform),
            Err(GateError::Configuration { missing: "surface" })
        );
    }
}
