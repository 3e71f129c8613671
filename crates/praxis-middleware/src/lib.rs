//! # Praxis Middleware
//!
//! Onion-model middleware chain for praxis actions.
//!
//! Each middleware receives the current context, the raw client input, the
//! action's metadata and the request event, plus a [`Next`] continuation.
//! Calling [`Next::run`] with a (possibly new) context runs the rest of the
//! chain and yields its result, which the middleware may inspect before
//! returning it.
//!
//! ```text
//!   mw1 ──▶ mw2 ──▶ ... ──▶ handler
//!   mw1 ◀── mw2 ◀── ... ◀── result
//! ```
//!
//! A middleware that returns without calling `next` fails the action with
//! [`praxis_core::MIDDLEWARE_DID_NOT_CALL_NEXT`].

#![doc(html_root_url = "https://docs.rs/praxis-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod chain;
pub mod middleware;

pub use chain::{boxed, BoxedMiddleware, ErasedContext, Invocation, MiddlewareChain, Terminal};
pub use middleware::{
    BoxFuture, EmptyContext, FnMiddleware, Middleware, MiddlewareArgs, MiddlewareResult, Next,
};
