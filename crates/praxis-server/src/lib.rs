//! # Praxis Server
//!
//! HTTP transport adapter for praxis actions.
//!
//! This crate is independent of any HTTP server implementation: requests
//! arrive as `http::Request<Bytes>` and leave as
//! `http::Response<Full<Bytes>>`, so the router can be mounted behind any
//! hyper-compatible service.
//!
//! - [`body_handler`] / [`query_handler`] erase a typed action into an
//!   [`ActionHandler`] that knows where its input lives
//! - [`ActionRouter`] maps `<prefix>/<name>` and a method to a handler
//! - [`read_body_input`] / [`read_query_input`] never fail; missing or
//!   malformed input becomes `null`

#![doc(html_root_url = "https://docs.rs/praxis-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod handler;
mod input;
mod response;
mod router;

pub use handler::{body_handler, query_handler, ActionHandler, InputSource};
pub use input::{read_body_input, read_query_input, INPUT_QUERY_KEY};
pub use response::{Response, ResponseExt, ACTION_NOT_FOUND, METHOD_NOT_ALLOWED};
pub use router::{ActionRouter, MethodRoutes};
