//! The guessing form used by simulations and tests.
//!
//! A form ([`FORM`]) holds a single text input ([`INPUT`]); results are
//! written to a separate element ([`RESULTS`]). Each keystroke is a guess
//! classified by a [`LetterCounter`].

use guessgate_app::{
    Driver, ElementId, GateConfig, Platform, RoundConfig, RoundController, RoundEndHandler,
    RoundInputHandler, RunSummary, Runtime, RuntimeError,
};

use crate::{GateSnapshot, InvariantRegistry, LetterCounter, SimError, SimPlatform};

/// Container reset when a round starts.
pub const FORM: ElementId = ElementId(1);

/// Text input the gate listens on.
pub const INPUT: ElementId = ElementId(2);

/// Element showing round results.
pub const RESULTS: ElementId = ElementId(3);

/// Platform holding the guessing form.
pub fn guessing_form() -> SimPlatform {
    SimPlatform::new()
        .with_element(FORM, None)
        .with_element(INPUT, Some(FORM))
        .with_element(RESULTS, None)
}

/// Round configuration for the guessing form: 3s after a win, 5s after a
/// loss.
pub fn guessing_config() -> RoundConfig {
    RoundConfig::new(GateConfig::new(INPUT, FORM), RESULTS).with_delays_ms(3000, 5000)
}

/// Controller classifying keystrokes with `counter` and restarting after
/// every round.
pub fn guessing_controller<P: Platform>(
    config: RoundConfig,
    mut counter: LetterCounter,
) -> RoundController<P> {
    let mut controller = RoundController::with_config(config);
    controller.set_on_input(RoundInputHandler::classifying(move |event| counter.classify(event)));
    controller.set_on_round_end(RoundEndHandler::restart());
    controller
}

/// Run `runtime` to completion, checking `invariants` after start and after
/// every event.
///
/// # Panics
///
/// Panics with context if an invariant is violated.
///
/// # Errors
///
/// Returns an error if the platform faults or a gate operation is rejected.
pub fn run_checked(
    runtime: &mut Runtime<SimPlatform>,
    invariants: &InvariantRegistry,
) -> Result<RunSummary, RuntimeError<SimError>> {
    let started = runtime.driver().now();
    runtime.start()?;
    check(runtime, invariants, "after start");

    let mut summary = RunSummary::default();
    let mut steps = 0_u64;
    while let Some(event) = runtime.driver_mut().poll_event().map_err(RuntimeError::Driver)? {
        steps += 1;
        let context = format!("after step {steps} ({event:?})");
        let keep_going = runtime.process(event, &mut summary)?;
        check(runtime, invariants, &context);
        if !keep_going {
            break;
        }
    }

    summary.elapsed = runtime.driver().now() - started;
    runtime.driver_mut().stop();
    Ok(summary)
}

fn check(runtime: &Runtime<SimPlatform>, invariants: &InvariantRegistry, context: &str) {
    let snapshot = GateSnapshot::capture(runtime.controller(), runtime.driver());
    invariants.assert_all(&snapshot, context);
}
