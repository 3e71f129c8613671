//! Observable invocation state.

use std::fmt;

use praxis_core::ValidationErrors;

/// Lifecycle of an action invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ActionStatus {
    /// Nothing has run since creation or the last reset.
    #[default]
    Idle,
    /// A call is in flight.
    Executing,
    /// The last settled call returned data.
    HasSucceeded,
    /// The last settled call returned an error.
    HasErrored,
}

impl ActionStatus {
    /// Returns the camelCase name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Executing => "executing",
            Self::HasSucceeded => "hasSucceeded",
            Self::HasErrored => "hasErrored",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the state published by a [`UseAction`](crate::UseAction).
#[derive(Debug, Clone, PartialEq)]
pub struct ActionState<O, E = String> {
    /// Current status.
    pub status: ActionStatus,
    /// Data from the last successful call; kept across later failures.
    pub data: Option<O>,
    /// Server error from the last settled call.
    pub server_error: Option<E>,
    /// Validation errors from the last settled call.
    pub validation_errors: Option<ValidationErrors>,
}

impl<O, E> Default for ActionState<O, E> {
    fn default() -> Self {
        Self {
            status: ActionStatus::Idle,
            data: None,
            server_error: None,
            validation_errors: None,
        }
    }
}

/// The error half of an action result, as handed to `on_error`.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionErrorPayload<E = String> {
    /// A server error, explicit or synthesized.
    ServerError(E),
    /// Input or explicit validation errors.
    ValidationErrors(ValidationErrors),
}
