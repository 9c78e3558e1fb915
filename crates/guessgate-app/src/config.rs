//! Gate and round configuration.
//!
//! Configuration is stored by `configure` and only read when an operation
//! needs it; missing handles are reported then, not at configure time.

use std::time::Duration;

use crate::{ElementId, EventKind};

/// Configuration of an [`crate::InputGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Element receiving input events.
    pub surface: Option<ElementId>,
    /// Resettable group enclosing the surface, cleared on view restore.
    pub container: Option<ElementId>,
    /// Event kind the gate listens for.
    pub event_kind: EventKind,
    /// Whether disabling also hides the surface.
    pub hide_on_disable: bool,
    /// Whether restoring the view moves focus back to the surface.
    pub refocus_on_enable: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            surface: None,
            container: None,
            event_kind: EventKind::default(),
            hide_on_disable: true,
            refocus_on_enable: true,
        }
    }
}

impl GateConfig {
    /// Configuration for a surface inside a container, with default flags.
    pub fn new(surface: ElementId, container: ElementId) -> Self {
        Self { surface: Some(surface), container: Some(container), ..Self::default() }
    }

    /// Listen for `kind` instead of `"input"`.
    #[must_use]
    pub fn with_event_kind(mut self, kind: impl Into<EventKind>) -> Self {
        self.event_kind = kind.into();
        self
    }

    /// Set whether disabling hides the surface.
    #[must_use]
    pub fn with_hide_on_disable(mut self, hide: bool) -> Self {
        self.hide_on_disable = hide;
        self
    }

    /// Set whether re-enabling restores focus.
    #[must_use]
    pub fn with_refocus_on_enable(mut self, refocus: bool) -> Self {
        self.refocus_on_enable = refocus;
        self
    }
}

/// Text written to the results target when a round ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundMessages {
    /// Shown after a win.
    pub won: String,
    /// Shown after a loss.
    pub lost: String,
}

impl Default for RoundMessages {
    fn default() -> Self {
        Self { won: "you won".into(), lost: "you lost".into() }
    }
}

/// Configuration of a [`crate::RoundController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConfig {
    /// Underlying gate configuration.
    pub gate: GateConfig,
    /// Element displaying the round result.
    pub results: Option<ElementId>,
    /// Pause after a win before the next round. Zero is allowed.
    pub win_delay: Duration,
    /// Pause after a loss before the next round. Zero is allowed.
    pub loss_delay: Duration,
    /// Result messages.
    pub messages: RoundMessages,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            gate: GateConfig::default(),
            results: None,
            win_delay: Duration::from_millis(3000),
            loss_delay: Duration::from_millis(6000),
            messages: RoundMessages::default(),
        }
    }
}

impl RoundConfig {
    /// Round configuration over `gate` writing results to `results`.
    pub fn new(gate: GateConfig, results: ElementId) -> Self {
        Self { gate, results: Some(results), ..Self::default() }
    }

    /// Set both round-end delays in milliseconds.
    #[must_use]
    pub fn with_delays_ms(mut self, win_ms: u64, loss_ms: u64) -> Self {
        self.win_delay = Duration::from_millis(win_ms);
        self.loss_delay = Duration::from_millis(loss_ms);
        self
    }

    /// Replace the result messages.
    #[must_use]
    pub fn with_messages(mut self, won: impl Into<String>, lost: impl Into<String>) -> Self {
        self.messages = RoundMessages { won: won.into(), lost: lost.into() };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_defaults_hide_and_refocus() {
        let config = GateConfig::default();

        assert_eq!(config.event_kind.as_str(), "input");
        assert!(config.hide_on_disable);
        assert!(config.refocus_on_enable);
        assert!(config.surface.is_none());
        assert!(config.container.is_none());
    }

    #[test]
    fn round_defaults() {
        let config = RoundConfig::default();

        assert_eq!(config.win_delay, Duration::from_millis(3000));
        assert_eq!(config.loss_delay, Duration::from_millis(6000));
        assert_eq!(config.messages.won, "you won");
        assert_eq!(config.messages.lost, "you lost");
    }

    #[test]
    fn builders_override_defaults() {
        let gate = GateConfig::new(ElementId(2), ElementId(1))
            .with_event_kind("keyup")
            .with_hide_on_disable(false)
            .with_refocus_on_enable(false);
        let config = RoundConfig::new(gate, ElementId(3))
            .with_delays_ms(0, 5000)
            .with_messages("yes", "no");

        assert_eq!(config.gate.event_kind, EventKind::new("keyup"));
        assert!(!config.gate.hide_on_disable);
        assert!(!config.gate.refocus_on_enable);
        assert_eq!(config.results, Some(ElementId(3)));
        assert_eq!(config.win_delay, Duration::ZERO);
        assert_eq!(config.loss_delay, Duration::from_millis(5000));
        assert_eq!(config.messages.lost, "no");
    }
}
