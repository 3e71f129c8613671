//! # Praxis
//!
//! **Type-safe server actions**
//!
//! Praxis turns plain async functions into validated, middleware-wrapped
//! endpoints with typed client references:
//!
//! - **Immutable builder**: schema, middleware and metadata compose into
//!   reusable snapshots
//! - **Onion middleware**: each layer may extend the context, post-process the
//!   result or recover from failures
//! - **Discriminated results**: every invocation settles as exactly one of
//!   `data`, `validationErrors` or `serverError`
//! - **Build-time discovery**: `praxis-codegen` mounts every file under
//!   `server/actions/` and emits handlers, a router and typed references
//!
//! ## Quick Start
//!
//! ```
//! use praxis::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Greet {
//!     name: String,
//! }
//!
//! const GREET: SafeActionReference<Greet, String> =
//!     SafeActionReference::new("greet", HttpMethod::Post);
//!
//! let greet = create_safe_action_client()
//!     .schema::<Greet>(Shape::object([("name", Shape::string().min_length(1))]))
//!     .action(|args: HandlerArgs<EmptyContext, Greet>| async move {
//!         Ok(format!("Hello, {}!", args.parsed_input.name))
//!     });
//!
//! let router = ActionRouter::new().route("greet", HttpMethod::Post, praxis::server::body_handler(greet));
//! let client = ActionClient::local(router);
//! # let _ = (client, GREET);
//! ```
//!
//! ## Crates
//!
//! | Module | Crate |
//! |--------|-------|
//! | [`core`] | results, errors, schemas, references |
//! | [`middleware`] | middleware trait and chain |
//! | [`action`] | builder and execution engine |
//! | [`server`] | input extraction and routing |
//! | [`client`] | transports and invocation state |
//! | [`telemetry`] | logging setup |
//! | [`config`] | layered configuration |

#![doc(html_root_url = "https://docs.rs/praxis/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use praxis_action as action;
pub use praxis_client as client;
pub use praxis_config as config;
pub use praxis_core as core;
pub use praxis_middleware as middleware;
pub use praxis_server as server;
pub use praxis_telemetry as telemetry;

// Paths used by generated code.
pub use praxis_core::{ActionTypes, HttpMethod, ReferenceOf, SafeActionReference};

pub use praxis_action::{create_safe_action_client, create_safe_action_client_with, Action};
pub use praxis_core::ActionResult;

/// Prelude module for convenient imports.
///
/// ```
/// use praxis::prelude::*;
/// ```
pub mod prelude {
    pub use praxis_core::{
        return_validation_errors, ActionError, ActionEvent, ActionFailure, ActionResult,
        ActionValidationError, HttpMethod, Metadata, SafeActionReference, Schema, Shape,
        ValidationErrors,
    };

    pub use praxis_middleware::{
        EmptyContext, FnMiddleware, Middleware, MiddlewareArgs, MiddlewareResult, Next,
    };

    pub use praxis_action::{
        create_safe_action_client, create_safe_action_client_with, Action, ActionBuilder,
        ClientOptions, HandlerArgs,
    };

    pub use praxis_server::ActionRouter;

    pub use praxis_client::{ActionClient, ActionStatus, UseAction};

    pub use serde_json::Value;
}
