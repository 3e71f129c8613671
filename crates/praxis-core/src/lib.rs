//! # Praxis Core
//!
//! Core types shared by every praxis crate:
//!
//! - [`ActionResult`] - The uniform discriminated result returned by every action
//! - [`ActionFailure`] - The failure taxonomy raised inside middleware and handlers
//! - [`ValidationErrors`] - Per-field validation messages
//! - [`Schema`] / [`Shape`] - Input and output shape validation
//! - [`ActionEvent`] - Read-only view of the transport request
//! - [`SafeActionReference`] - Typed, logic-free client stub for an action

#![doc(html_root_url = "https://docs.rs/praxis-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod event;
mod metadata;
mod reference;
mod result;
pub mod schema;

pub use error::{
    return_validation_errors, ActionError, ActionFailure, ActionValidationError, FailureKind,
    ValidationErrors, DEFAULT_SERVER_ERROR_MESSAGE, MIDDLEWARE_DID_NOT_CALL_NEXT, ROOT_FIELD,
};
pub use event::{ActionEvent, RequestId};
pub use metadata::Metadata;
pub use reference::{
    ActionTypes, HttpMethod, ReferenceOf, SafeActionReference, DEFAULT_ROUTE_PREFIX,
};
pub use result::{map_failure, ActionResult, ErrorTranslator};
pub use schema::{schema_fn, Schema, Shape};
