//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture controller and platform state at one point in time so
//! all invariants see the same, consistent view.

use guessgate_app::{Gate, GateState, Platform, RoundController, RoundState};

use crate::SimPlatform;

/// Observable state of one round controller and its surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSnapshot {
    /// Gate state as the controller sees it.
    pub gate: GateState,
    /// Round state.
    pub round: RoundState,
    /// Whether the gate hides its surface when disabled.
    pub hide_on_disable: bool,
    /// Listener registrations on the surface for the gate's event kind.
    pub listeners: usize,
    /// Whether the surface is visible.
    pub surface_visible: bool,
    /// Whether the controller tracks a pending round-end timer.
    pub pending_timer: bool,
    /// Timers queued on the platform.
    pub scheduled_timers: usize,
}

impl GateSnapshot {
    /// Capture the state of `controller` on `platform`.
    pub fn capture(controller: &RoundController<SimPlatform>, platform: &SimPlatform) -> Self {
        let config = controller.gate().config();
        let surface = config.surface;

        Self {
            gate: controller.state(),
            round: controller.round_state(),
            hide_on_disable: config.hide_on_disable,
            listeners: surface
                .map_or(0, |id| platform.listener_count(id, config.event_kind.as_str())),
            surface_visible: surface.is_some_and(|id| platform.is_visible(id)),
            pending_timer: controller.pending_timer().is_some(),
            scheduled_timers: platform.pending_timers(),
        }
    }
}
