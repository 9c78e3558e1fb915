//! Error types for gates and the runtime.
//!
//! Gate operations are local, synchronous state changes with no I/O, so
//! nothing here is transient: every error is a caller or configuration defect
//! surfaced immediately, never retried.

use thiserror::Error;

use crate::GateState;

/// Errors raised by gate and round operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// A required handle or callback is missing when an operation needs it.
    #[error("configuration error: {missing} is not set")]
    Configuration {
        /// What is missing (e.g. "surface", "input callback").
        missing: &'static str,
    },

    /// The operation's precondition does not hold in the current state.
    #[error("invalid state transition: cannot {operation} from {state:?}")]
    InvalidStateTransition {
        /// Gate state when the operation was attempted.
        state: GateState,
        /// Operation that was attempted.
        operation: &'static str,
    },
}

/// Errors that stop the [`crate::Runtime`] loop.
#[derive(Error, Debug)]
pub enum RuntimeError<E>
where
    E: std::error::Error + 'static,
{
    /// The driver failed to deliver events.
    #[error("driver error: {0}")]
    Driver(#[source] E),

    /// A gate operation failed.
    #[error(transparent)]
    Gate(#[from] GateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_name_what_is_missing() {
        let err = GateError::Configuration { missing: "surface" };

        assert_eq!(err.to_string(), "configuration error: surface is not set");
    }

    #[test]
    fn state_errors_name_operation_and_state() {
        let err = GateError::InvalidStateTransition {
            state: GateState::Suppressed,
            operation: "disable listener",
        };

        assert_eq!(
            err.to_string(),
            "invalid state transition: cannot disable listener from Suppressed"
        );
    }
}
