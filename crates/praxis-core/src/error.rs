//! Error taxonomy for action execution.
//!
//! Failures raised while an action runs are classified in priority order:
//!
//! | Kind | Raised by | Surfaced as |
//! |------|-----------|-------------|
//! | Input shape rejection | input schema | `validationErrors` |
//! | Explicit validation failure | [`ActionValidationError`] | `validationErrors` |
//! | Explicit server error | [`ActionError`] | `serverError` (exact message) |
//! | Middleware contract violation | chain executor | `serverError` ([`MIDDLEWARE_DID_NOT_CALL_NEXT`]) |
//! | Output shape rejection | output schema | `serverError` (embeds field errors) |
//! | Unclassified failure | anything else | translator output or [`DEFAULT_SERVER_ERROR_MESSAGE`] |
//!
//! The first three kinds are expected control flow. The last three are
//! defects and are logged by the engine.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Diagnostic returned when a middleware completes without calling `next`.
///
/// This string is part of the public contract and is matched by callers.
pub const MIDDLEWARE_DID_NOT_CALL_NEXT: &str = "Middleware did not call next()";

/// Fallback server error used when no error translator is configured.
pub const DEFAULT_SERVER_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Field key used for validation messages that have no field path.
pub const ROOT_FIELD: &str = "_root";

/// Field-specific validation errors.
///
/// Maps a dot-joined field path to the ordered list of messages for that
/// field. Insertion order is preserved so serialized output is stable.
///
/// # Example
///
/// ```
/// use praxis_core::ValidationErrors;
///
/// let errors = ValidationErrors::new()
///     .with("email", "This email is already taken")
///     .with("email", "Must be a company address");
///
/// assert_eq!(errors.get("email").map(<[String]>::len), Some(2));
/// assert_eq!(
///     errors.to_string(),
///     r#"{"email":["This email is already taken","Must be a company address"]}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(IndexMap<String, Vec<String>>);

impl ValidationErrors {
    /// Creates a new empty set of errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set holding a single message under [`ROOT_FIELD`].
    #[must_use]
    pub fn root(message: impl Into<String>) -> Self {
        Self::new().with(ROOT_FIELD, message)
    }

    /// Adds an error for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Adds an error for a field, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    /// Appends every message of `other`, keeping field order.
    pub fn extend(&mut self, other: ValidationErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// Returns the messages recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns `true` if any message was recorded for `field`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterates over `(field, messages)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns `true` if there are no field errors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Consumes the set and returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.0
    }
}

impl<K, V> FromIterator<(K, V)> for ValidationErrors
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut errors = Self::new();
        for (field, messages) in iter {
            let field = field.into();
            for message in messages {
                errors.add(field.clone(), message);
            }
        }
        errors
    }
}

/// Renders the errors as compact JSON, the form embedded in server errors.
impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// A user-facing server error raised from a handler or middleware.
///
/// The message is returned verbatim as the result's `serverError` and never
/// passes through the error translator.
///
/// ```
/// use praxis_core::{ActionError, ActionFailure};
///
/// fn spend(credits: u32) -> Result<(), ActionFailure> {
///     if credits == 0 {
///         return Err(ActionError::new("Not enough credits").into());
///     }
///     Ok(())
/// }
///
/// assert!(spend(0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    /// Creates an explicit server error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes the error and returns the message.
    #[must_use]
    pub fn into_message(self) -> String {
        self.message
    }
}

/// Per-field validation errors raised deliberately from a handler or middleware.
///
/// Used for checks a schema cannot express, such as uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed")]
pub struct ActionValidationError {
    errors: ValidationErrors,
}

impl ActionValidationError {
    /// Creates an explicit validation failure.
    #[must_use]
    pub fn new(errors: ValidationErrors) -> Self {
        Self { errors }
    }

    /// Returns the field errors.
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Consumes the error and returns the field errors.
    #[must_use]
    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}

/// Returns an explicit validation failure from within a handler.
///
/// Shorthand for `Err(ActionValidationError::new(errors).into())`; it never
/// returns `Ok`.
///
/// ```
/// use praxis_core::{return_validation_errors, ActionFailure, ValidationErrors};
///
/// fn register(email: &str) -> Result<bool, ActionFailure> {
///     if email == "taken@example.com" {
///         return return_validation_errors(
///             ValidationErrors::new().with("email", "This email is already taken"),
///         );
///     }
///     Ok(true)
/// }
///
/// assert!(register("taken@example.com").is_err());
/// ```
pub fn return_validation_errors<T>(errors: ValidationErrors) -> Result<T, ActionFailure> {
    Err(ActionValidationError::new(errors).into())
}

/// A failure raised during middleware, handler or output validation.
///
/// Handlers return `Result<T, ActionFailure>`; any `anyhow::Error` converts
/// through `?`. An [`ActionError`] or [`ActionValidationError`] carried inside
/// the `anyhow::Error` keeps its classification; everything else becomes
/// [`ActionFailure::Unexpected`].
#[derive(Debug, Error)]
pub enum ActionFailure {
    /// Explicit per-field validation failure.
    #[error(transparent)]
    Validation(#[from] ActionValidationError),

    /// Explicit user-facing server error.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// A middleware returned without invoking `next`.
    #[error("Middleware did not call next()")]
    MiddlewareSkippedNext {
        /// Name of the offending middleware.
        middleware: &'static str,
    },

    /// The handler's return value was rejected by the output schema.
    #[error("Output validation failed: {0}")]
    OutputValidation(ValidationErrors),

    /// Any other failure.
    #[error(transparent)]
    Unexpected(anyhow::Error),
}

impl From<anyhow::Error> for ActionFailure {
    fn from(error: anyhow::Error) -> Self {
        Self::classify(error)
    }
}

impl ActionFailure {
    /// Creates an explicit server error failure.
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::Action(ActionError::new(message))
    }

    /// Creates an explicit validation failure.
    #[must_use]
    pub fn validation(errors: ValidationErrors) -> Self {
        Self::Validation(ActionValidationError::new(errors))
    }

    /// Creates an unclassified failure from any error value.
    pub fn unexpected(error: impl Into<anyhow::Error>) -> Self {
        Self::Unexpected(error.into())
    }

    /// Recovers an explicit failure wrapped in `error`, whatever path it
    /// travelled. Anything unrecognised becomes [`ActionFailure::Unexpected`].
    pub fn classify(error: anyhow::Error) -> Self {
        let error = match error.downcast::<ActionError>() {
            Ok(error) => return Self::Action(error),
            Err(error) => error,
        };
        let error = match error.downcast::<ActionValidationError>() {
            Ok(error) => return Self::Validation(error),
            Err(error) => error,
        };
        match error.downcast::<Self>() {
            Ok(Self::Unexpected(inner)) => Self::classify(inner),
            Ok(failure) => failure,
            Err(error) => Self::Unexpected(error),
        }
    }

    /// Creates an unclassified failure from a message.
    #[must_use]
    pub fn unexpected_msg(message: impl fmt::Display + fmt::Debug + Send + Sync + 'static) -> Self {
        Self::Unexpected(anyhow::Error::msg(message))
    }

    /// Returns the classification of this failure.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::ExplicitValidation,
            Self::Action(_) => FailureKind::ExplicitServerError,
            Self::MiddlewareSkippedNext { .. } => FailureKind::MiddlewareContract,
            Self::OutputValidation(_) => FailureKind::OutputValidation,
            Self::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

/// Classification of an action outcome, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Raw input rejected by the input schema.
    InputValidation,
    /// Explicit per-field failure from a handler or middleware.
    ExplicitValidation,
    /// Explicit user-facing server error.
    ExplicitServerError,
    /// Middleware finished without calling `next`.
    MiddlewareContract,
    /// Handler output rejected by the output schema.
    OutputValidation,
    /// Anything else.
    Unexpected,
}

impl FailureKind {
    /// Returns `true` for kinds that indicate a server-side defect.
    #[must_use]
    pub const fn is_defect(self) -> bool {
        matches!(
            self,
            Self::MiddlewareContract | Self::OutputValidation | Self::Unexpected
        )
    }

    /// Returns a stable label for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidation => "input_validation",
            Self::ExplicitValidation => "explicit_validation",
            Self::ExplicitServerError => "explicit_server_error",
            Self::MiddlewareContract => "middleware_contract",
            Self::OutputValidation => "output_validation",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
