//! # Praxis Action
//!
//! Builder and execution engine for praxis actions.
//!
//! An action is assembled with an immutable builder:
//!
//! ```
//! use praxis_action::{create_safe_action_client, HandlerArgs};
//! use praxis_core::{ActionEvent, ActionResult, Shape};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Greet {
//!     name: String,
//! }
//!
//! let greet = create_safe_action_client()
//!     .schema::<Greet>(Shape::object([(
//!         "name",
//!         Shape::string().min_length(1).message("Name is required"),
//!     )]))
//!     .action(|args: HandlerArgs<_, Greet>| async move {
//!         Ok(format!("Hello, {}!", args.parsed_input.name))
//!     });
//!
//! # tokio_test::block_on(async {
//! let result = greet
//!     .execute(serde_json::json!({ "name": "Alice" }), ActionEvent::detached())
//!     .await;
//! assert_eq!(result, ActionResult::Data(serde_json::json!("Hello, Alice!")));
//! # });
//! ```
//!
//! Every step returns a new snapshot, so a partially configured builder can
//! be shared:
//!
//! ```
//! use praxis_action::create_safe_action_client;
//! use praxis_core::Metadata;
//!
//! let base = create_safe_action_client().metadata(Metadata::new().with("area", "billing"));
//! let a = base.metadata(Metadata::new().with("actionName", "charge"));
//! let b = base.metadata(Metadata::new().with("actionName", "refund"));
//! assert_eq!(a.current_metadata().action_name(), Some("charge"));
//! assert_eq!(b.current_metadata().action_name(), Some("refund"));
//! assert_eq!(base.current_metadata().action_name(), None);
//! ```

#![doc(html_root_url = "https://docs.rs/praxis-action/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod builder;
mod client;

pub use action::{Action, HandlerArgs};
pub use builder::ActionBuilder;
pub use client::{create_safe_action_client, create_safe_action_client_with, ClientOptions};
