//! The uniform action result and the failure-to-result mapper.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{
    ActionFailure, ValidationErrors, DEFAULT_SERVER_ERROR_MESSAGE, MIDDLEWARE_DID_NOT_CALL_NEXT,
};

/// Converts an unclassified failure into a caller-visible server error.
pub type ErrorTranslator<E> = Arc<dyn Fn(&anyhow::Error) -> E + Send + Sync>;

/// Result of executing an action.
///
/// Exactly one variant is populated. On the wire this is a JSON object with a
/// single key: `data`, `validationErrors` or `serverError`.
///
/// ```
/// use praxis_core::ActionResult;
///
/// let result: ActionResult<String> = ActionResult::Data("Hello, Alice!".into());
/// assert_eq!(
///     serde_json::to_string(&result).unwrap(),
///     r#"{"data":"Hello, Alice!"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionResult<T, E = String> {
    /// The handler's (validated) output.
    Data(T),
    /// Per-field validation messages.
    ValidationErrors(ValidationErrors),
    /// A caller-visible server error.
    ServerError(E),
}

impl<T, E> ActionResult<T, E> {
    /// Returns the data, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Consumes the result and returns the data, if any.
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the validation errors, if any.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::ValidationErrors(errors) => Some(errors),
            _ => None,
        }
    }

    /// Returns the server error, if any.
    pub fn server_error(&self) -> Option<&E> {
        match self {
            Self::ServerError(error) => Some(error),
            _ => None,
        }
    }

    /// Returns `true` if the result carries data.
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// Returns `true` if the result carries an error of either kind.
    pub const fn is_error(&self) -> bool {
        !self.is_data()
    }

    /// Maps the data variant.
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> ActionResult<U, E> {
        match self {
            Self::Data(data) => ActionResult::Data(f(data)),
            Self::ValidationErrors(errors) => ActionResult::ValidationErrors(errors),
            Self::ServerError(error) => ActionResult::ServerError(error),
        }
    }

    /// Returns a stable label for the populated variant.
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Data(_) => "data",
            Self::ValidationErrors(_) => "validation_errors",
            Self::ServerError(_) => "server_error",
        }
    }
}

/// Maps a failure to its result variant.
///
/// Explicit errors and contract violations keep their own messages; only
/// [`ActionFailure::Unexpected`] passes through `translator`. A translator
/// that panics falls back to [`DEFAULT_SERVER_ERROR_MESSAGE`], so the mapper
/// itself never fails.
///
/// ```
/// use praxis_core::{map_failure, ActionFailure, ActionResult};
///
/// let result: ActionResult<()> = map_failure(ActionFailure::server("Not enough credits"), None);
/// assert_eq!(result.server_error().map(String::as_str), Some("Not enough credits"));
/// ```
pub fn map_failure<T, E>(
    failure: ActionFailure,
    translator: Option<&ErrorTranslator<E>>,
) -> ActionResult<T, E>
where
    E: From<String>,
{
    match failure {
        ActionFailure::Validation(error) => ActionResult::ValidationErrors(error.into_errors()),
        ActionFailure::Action(error) => ActionResult::ServerError(E::from(error.into_message())),
        ActionFailure::MiddlewareSkippedNext { .. } => {
            ActionResult::ServerError(E::from(MIDDLEWARE_DID_NOT_CALL_NEXT.to_string()))
        }
        failure @ ActionFailure::OutputValidation(_) => {
            ActionResult::ServerError(E::from(failure.to_string()))
        }
        ActionFailure::Unexpected(error) => match ActionFailure::classify(error) {
            ActionFailure::Unexpected(error) => translate_unexpected(&error, translator),
            classified => map_failure(classified, translator),
        },
    }
}

fn translate_unexpected<T, E>(
    error: &anyhow::Error,
    translator: Option<&ErrorTranslator<E>>,
) -> ActionResult<T, E>
where
    E: From<String>,
{
    let translated =
        translator.and_then(|translate| catch_unwind(AssertUnwindSafe(|| translate(error))).ok());
    match translated {
        Some(server_error) => ActionResult::ServerError(server_error),
        None => {
            if translator.is_some() {
                tracing::error!(error = %error, "Server error translator panicked");
            }
            ActionResult::ServerError(E::from(DEFAULT_SERVER_ERROR_MESSAGE.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActionError;
    use serde_json::json;

    type Result = ActionResult<serde_json::Value>;

    #[test]
    fn test_wire_shape() {
        let data: Result = ActionResult::Data(json!({ "doubled": 10 }));
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({ "data": { "doubled": 10 } })
        );

        let invalid: Result =
            ActionResult::ValidationErrors(ValidationErrors::new().with("name", "Name is required"));
        assert_eq!(
            serde_json::to_value(&invalid).unwrap(),
            json!({ "validationErrors": { "name": ["Name is required"] } })
        );

        let failed: Result = ActionResult::ServerError("Not enough credits".into());
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({ "serverError": "Not enough credits" })
        );
    }

    #[test]
    fn test_wire_shape_round_trips_from_json() {
        let parsed: Result =
            serde_json::from_value(json!({ "serverError": "Database connection refused" })).unwrap();
        assert_eq!(parsed.server_error().map(String::as_str), Some("Database connection refused"));
        assert!(parsed.is_error());
    }

    #[test]
    fn test_explicit_errors_bypass_translator() {
        let translator: ErrorTranslator<String> = Arc::new(|_| "translated".to_string());

        let result: Result = map_failure(ActionFailure::server("Not enough credits"), Some(&translator));
        assert_eq!(result, ActionResult::ServerError("Not enough credits".into()));

        let result: Result = map_failure(
            ActionFailure::MiddlewareSkippedNext { middleware: "gate" },
            Some(&translator),
        );
        assert_eq!(result, ActionResult::ServerError(MIDDLEWARE_DID_NOT_CALL_NEXT.into()));

        let result: Result = map_failure(
            ActionFailure::OutputValidation(ValidationErrors::new().with("doubled", "too big")),
            Some(&translator),
        );
        assert_eq!(
            result.server_error().map(String::as_str),
            Some(r#"Output validation failed: {"doubled":["too big"]}"#)
        );
    }

    #[test]
    fn test_unexpected_uses_translator() {
        let translator: ErrorTranslator<String> =
            Arc::new(|err| format!("Server error: {err}"));
        let result: Result = map_failure(
            ActionFailure::unexpected_msg("Database connection refused"),
            Some(&translator),
        );
        assert_eq!(
            result,
            ActionResult::ServerError("Server error: Database connection refused".into())
        );
    }

    #[test]
    fn test_unexpected_without_translator_is_generic() {
        let result: Result = map_failure(ActionFailure::unexpected_msg("secret detail"), None);
        assert_eq!(result, ActionResult::ServerError(DEFAULT_SERVER_ERROR_MESSAGE.into()));
    }

    #[test]
    fn test_unexpected_wrapping_explicit_error_is_reclassified() {
        let translator: ErrorTranslator<String> = Arc::new(|_| "translated".to_string());
        let wrapped = ActionFailure::unexpected(ActionError::new("Not enough credits"));
        let result: Result = map_failure(wrapped, Some(&translator));
        assert_eq!(result, ActionResult::ServerError("Not enough credits".into()));
    }

    #[test]
    fn test_panicking_translator_falls_back() {
        let translator: ErrorTranslator<String> = Arc::new(|_| panic!("translator bug"));
        let result: Result = map_failure(ActionFailure::unexpected_msg("x"), Some(&translator));
        assert_eq!(result, ActionResult::ServerError(DEFAULT_SERVER_ERROR_MESSAGE.into()));
    }

    #[test]
    fn test_custom_error_type() {
        #[derive(Debug, PartialEq)]
        struct Coded {
            code: u16,
            message: String,
        }

        impl From<String> for Coded {
            fn from(message: String) -> Self {
                Self { code: 500, message }
            }
        }

        let translator: ErrorTranslator<Coded> = Arc::new(|err| Coded {
            code: 503,
            message: err.to_string(),
        });
        let result: ActionResult<(), Coded> =
            map_failure(ActionFailure::unexpected_msg("down"), Some(&translator));
        assert_eq!(result.server_error().map(|c| c.code), Some(503));

        let result: ActionResult<(), Coded> =
            map_failure(ActionFailure::server("Not enough credits"), Some(&translator));
        assert_eq!(result.server_error().map(|c| c.code), Some(500));
    }

    #[test]
    fn test_map_data_and_outcome() {
        let result: ActionResult<u32> = ActionResult::Data(2);
        let mapped = result.map_data(|n| n * 10);
        assert_eq!(mapped.data(), Some(&20));
        assert_eq!(mapped.outcome(), "data");
    }
}
