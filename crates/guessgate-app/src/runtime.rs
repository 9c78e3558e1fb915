//! Generic runtime for the input gating event loop.
//!
//! The Runtime feeds events from a [`Driver`] into a [`RoundController`]. It
//! is single-threaded and cooperative: each event runs to completion before
//! the next one is polled.

use std::time::Duration;

use tracing::{debug, info};

use crate::{Delivery, Driver, Gate, GateError, HostEvent, RoundController, RuntimeError};

/// Counters collected by [`Runtime::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Input events that reached the input callback.
    pub delivered: u64,
    /// Input events the gate dropped.
    pub dropped: u64,
    /// Round-end timers that fired and ran the round-end callback.
    pub round_ends: u64,
    /// Driver time between start and end of the run.
    pub elapsed: Duration,
}

/// Event loop driving one [`RoundController`] on one [`Driver`].
pub struct Runtime<D: Driver> {
    driver: D,
    controller: RoundController<D>,
}

impl<D: Driver> Runtime<D> {
    /// Create a runtime. Nothing is enabled until [`Runtime::start`].
    pub fn new(driver: D, controller: RoundController<D>) -> Self {
        Self { driver, controller }
    }

    /// Enable input unless the controller is already listening.
    pub fn start(&mut self) -> Result<(), GateError> {
        if self.controller.is_listening() {
            return Ok(());
        }
        self.controller.enable(&mut self.driver)
    }

    /// Run until the driver has no more events or delivers
    /// [`HostEvent::Quit`].
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails or a gate operation is rejected.
    pub fn run(&mut self) -> Result<RunSummary, RuntimeError<D::Error>> {
        let started = self.driver.now();
        self.start()?;

        let mut summary = RunSummary::default();
        while let Some(event) = self.driver.poll_event().map_err(RuntimeError::Driver)? {
            if !self.process(event, &mut summary)? {
                break;
            }
        }

        summary.elapsed = self.driver.now() - started;
        self.driver.stop();
        info!(
            "run finished: {} delivered, {} dropped, {} rounds ended",
            summary.delivered, summary.dropped, summary.round_ends
        );
        Ok(summary)
    }

    /// Process one event, updating `summary`.
    ///
    /// Returns `false` if the runtime should stop.
    pub fn process(
        &mut self,
        event: HostEvent,
        summary: &mut RunSummary,
    ) -> Result<bool, GateError> {
        match event {
            HostEvent::Input { target, event } => {
                match self.controller.dispatch(&mut self.driver, target, &event)? {
                    Delivery::Delivered => summary.delivered += 1,
                    Delivery::Dropped => summary.dropped += 1,
                }
            },
            HostEvent::TimerFired(timer) => {
                if self.controller.timer_fired(&mut self.driver, timer)? {
                    summary.round_ends += 1;
                }
            },
            HostEvent::Quit => {
                debug!("quit requested");
                return Ok(false);
            },
        }
        Ok(true)
    }

    /// Get a reference to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Get a reference to the controller.
    pub fn controller(&self) -> &RoundController<D> {
        &self.controller
    }

    /// Split the runtime back into driver and controller.
    pub fn into_parts(self) -> (D, RoundController<D>) {
        (self.driver, self.controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        GateConfig, InputEvent, RoundConfig, RoundEndHandler, RoundInputHandler, RoundOutcome,
        TimerId,
        testing::{FORM, RESULTS, SURFACE, ScriptError, ScriptedDriver},
    };

    fn runtime(events: Vec<HostEvent>) -> Runtime<ScriptedDriver> {
        let config = RoundConfig::new(GateConfig::new(SURFACE, FORM), RESULTS);
        let mut controller = RoundController::with_config(config);
        controller.set_on_input(RoundInputHandler::classifying(|event: &InputEvent| {
            match event.data() {
                Some("w") => RoundOutcome::Won,
                _ => RoundOutcome::Continuing,
            }
        }));
        controller.set_on_round_end(RoundEndHandler::restart());
        Runtime::new(ScriptedDriver::new(events), controller)
    }

    fn key(data: &str) -> HostEvent {
        HostEvent::Input { target: SURFACE, event: InputEvent::input(data) }
    }

    #[test]
    fn run_counts_deliveries_and_round_ends() {
        let mut runtime =
            runtime(vec![key("a"), key("w"), key("x"), HostEvent::TimerFired(TimerId(1))]);

        let summary = runtime.run().unwrap();

        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.round_ends, 1);
        assert!(runtime.controller().is_listening());
        assert!(runtime.driver().stopped);
    }

    #[test]
    fn quit_stops_before_remaining_events() {
        let mut runtime = runtime(vec![key("a"), HostEvent::Quit, key("b")]);

        let summary = runtime.run().unwrap();

        assert_eq!(summary.delivered, 1);
        assert_eq!(runtime.driver().events.len(), 1);
    }

    #[test]
    fn stale_timer_is_not_a_round_end() {
        let mut runtime = runtime(vec![HostEvent::TimerFired(TimerId(7))]);

        let summary = runtime.run().unwrap();

        assert_eq!(summary.round_ends, 0);
        assert!(runtime.controller().is_listening());
    }

    #[test]
    fn start_is_idempotent() {
        let mut runtime = runtime(Vec::new());

        runtime.start().unwrap();
        runtime.start().unwrap();

        assert_eq!(runtime.driver().platform.listener_count(SURFACE, "input"), 1);
    }

    #[test]
    fn driver_errors_are_wrapped() {
        let mut runtime = runtime(Vec::new());
        runtime.driver_mut().events.push_back(Err(ScriptError));

        let err = runtime.run().unwrap_err();

        assert!(matches!(err, RuntimeError::Driver(ScriptError)));
    }

    #[test]
    fn gate_errors_abort_the_run() {
        let (driver, mut controller) = runtime(vec![key("a")]).into_parts();
        controller.set_on_input(RoundInputHandler::new(|controller, platform, _| {
            controller.finish_round(platform, RoundOutcome::Continuing).map(|_| ())
        }));
        let mut runtime = Runtime::new(driver, controller);

        let err = runtime.run().unwrap_err();

        assert!(matches!(err, RuntimeError::Gate(GateError::InvalidStateTransition { .. })));
    }
}
