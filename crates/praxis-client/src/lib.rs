//! # Praxis Client
//!
//! Typed callers for praxis actions.
//!
//! A [`SafeActionReference`](praxis_core::SafeActionReference) names an
//! action's route and method and carries its input, output and server error
//! types. This crate turns a reference into calls:
//!
//! - [`ActionClient::call`] for one-shot requests
//! - [`UseAction`] for stateful invocation with an observable
//!   [`ActionState`] and lifecycle callbacks
//!
//! Requests travel over a [`Transport`]: [`HttpTransport`] for a remote
//! server or [`LocalTransport`] for an in-process router.

#![doc(html_root_url = "https://docs.rs/praxis-client/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod state;
mod transport;
mod use_action;

pub use client::ActionClient;
pub use error::TransportError;
pub use state::{ActionErrorPayload, ActionState, ActionStatus};
pub use transport::{BoxFuture, HttpTransport, LocalTransport, Transport};
pub use use_action::{use_action, UseAction};
