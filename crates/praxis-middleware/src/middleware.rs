//! Core middleware trait and types.
//!
//! This module defines the [`Middleware`] trait that all action middleware
//! implement. A middleware runs before the handler, may replace the context
//! seen by everything after it, and sees the handler's result on the way back.
//!
//! # Example
//!
//! ```
//! use praxis_middleware::{BoxFuture, Middleware, MiddlewareArgs, MiddlewareResult, Next};
//!
//! #[derive(Debug)]
//! struct Authed {
//!     user_id: String,
//! }
//!
//! struct RequireUser;
//!
//! impl Middleware<(), Authed> for RequireUser {
//!     fn name(&self) -> &'static str {
//!         "require-user"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         args: MiddlewareArgs<()>,
//!         next: Next<Authed>,
//!     ) -> BoxFuture<'a, MiddlewareResult> {
//!         Box::pin(async move {
//!             let user_id = args.event.header("x-user-id").unwrap_or("anonymous").to_string();
//!             next.run(Authed { user_id }).await
//!         })
//!     }
//! }
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use praxis_core::{ActionEvent, ActionFailure, ActionResult, Metadata};
use serde_json::Value;

use crate::chain::ErasedNext;

/// A boxed future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a middleware (and the chain below it) produces.
///
/// `Ok` carries a result whose data is still untyped JSON; `Err` carries a
/// failure that the engine maps to a result.
pub type MiddlewareResult<E = String> = Result<ActionResult<Value, E>, ActionFailure>;

/// The context every chain starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyContext;

/// Arguments handed to a middleware.
#[derive(Debug, Clone)]
pub struct MiddlewareArgs<Ctx> {
    /// Context produced by the previous middleware.
    pub ctx: Ctx,
    /// Raw, unvalidated client input.
    pub client_input: Arc<Value>,
    /// Static metadata of the action.
    pub metadata: Arc<Metadata>,
    /// The request that triggered the action.
    pub event: ActionEvent,
}

/// The core middleware trait.
///
/// `CtxIn` is the context produced by the previous middleware and `CtxOut`
/// the context this middleware passes to [`Next::run`].
///
/// # Invariants
///
/// - A middleware MUST call `next.run()` unless it fails the action by
///   returning `Err`
/// - Returning `Ok` without calling `next` is a contract violation and the
///   value returned is discarded
pub trait Middleware<CtxIn, CtxOut, E = String>: Send + Sync + 'static {
    /// Returns the name of this middleware, used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Processes the invocation.
    fn process<'a>(
        &'a self,
        args: MiddlewareArgs<CtxIn>,
        next: Next<CtxOut, E>,
    ) -> BoxFuture<'a, MiddlewareResult<E>>;
}

/// Continuation that runs the rest of the chain.
///
/// Consumed by [`run`](Next::run), so it can be invoked at most once.
pub struct Next<Ctx, E = String> {
    inner: ErasedNext<E>,
    _ctx: PhantomData<fn(Ctx)>,
}

impl<Ctx, E> Next<Ctx, E>
where
    Ctx: Send + 'static,
    E: Send + 'static,
{
    pub(crate) fn new(inner: ErasedNext<E>) -> Self {
        Self {
            inner,
            _ctx: PhantomData,
        }
    }

    /// Runs the remaining middleware and the handler with `ctx`.
    pub async fn run(self, ctx: Ctx) -> MiddlewareResult<E> {
        self.inner.run(Box::new(ctx)).await
    }
}

impl<Ctx, E> std::fmt::Debug for Next<Ctx, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field("ctx", &std::any::type_name::<Ctx>())
            .finish_non_exhaustive()
    }
}

/// A middleware created from an async function.
///
/// # Example
///
/// ```
/// use praxis_middleware::{EmptyContext, FnMiddleware, MiddlewareArgs, Next};
///
/// #[derive(Debug)]
/// struct Traced {
///     request_id: String,
/// }
///
/// let middleware = FnMiddleware::new(
///     "trace",
///     |args: MiddlewareArgs<EmptyContext>, next: Next<Traced>| async move {
///         let request_id = args.event.request_id().to_string();
///         next.run(Traced { request_id }).await
///     },
/// );
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Fut, CtxIn, CtxOut, E> Middleware<CtxIn, CtxOut, E> for FnMiddleware<F>
where
    F: Fn(MiddlewareArgs<CtxIn>, Next<CtxOut, E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MiddlewareResult<E>> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        args: MiddlewareArgs<CtxIn>,
        next: Next<CtxOut, E>,
    ) -> BoxFuture<'a, MiddlewareResult<E>> {
        Box::pin((self.func)(args, next))
    }
}

impl<F> std::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnMiddleware")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{boxed, Invocation, MiddlewareChain, Terminal};
    use serde_json::json;

    struct Tag(&'static str);

    impl Middleware<Vec<&'static str>, Vec<&'static str>> for Tag {
        fn name(&self) -> &'static str {
            self.0
        }

        fn process<'a>(
            &'a self,
            mut args: MiddlewareArgs<Vec<&'static str>>,
            next: Next<Vec<&'static str>>,
        ) -> BoxFuture<'a, MiddlewareResult> {
            Box::pin(async move {
                args.ctx.push(self.0);
                next.run(args.ctx).await
            })
        }
    }

    fn echo_terminal() -> Terminal<String> {
        Box::new(|ctx: crate::chain::ErasedContext| -> BoxFuture<'static, MiddlewareResult> {
            Box::pin(async move {
                let visited = ctx
                    .downcast::<Vec<&'static str>>()
                    .map_err(|_| ActionFailure::unexpected_msg("bad context"))?;
                Ok(ActionResult::Data(json!(*visited)))
            })
        })
    }

    #[test]
    fn test_default_name_is_type_name() {
        struct Unnamed;
        impl Middleware<(), ()> for Unnamed {
            fn process<'a>(
                &'a self,
                args: MiddlewareArgs<()>,
                next: Next<()>,
            ) -> BoxFuture<'a, MiddlewareResult> {
                Box::pin(next.run(args.ctx))
            }
        }
        assert!(Middleware::<(), ()>::name(&Unnamed).ends_with("Unnamed"));
    }

    #[tokio::test]
    async fn test_typed_middleware_threads_context() {
        let chain = MiddlewareChain::new()
            .with(boxed(Tag("first")))
            .with(boxed(Tag("second")));

        let result = chain
            .execute(
                Box::new(Vec::<&'static str>::new()),
                Invocation::detached(json!(null)),
                echo_terminal(),
            )
            .await
            .unwrap();

        assert_eq!(result, ActionResult::Data(json!(["first", "second"])));
    }

    #[tokio::test]
    async fn test_fn_middleware_sees_client_input() {
        let middleware = FnMiddleware::new(
            "peek",
            |args: MiddlewareArgs<Vec<&'static str>>, next: Next<Vec<&'static str>>| async move {
                let mut ctx = args.ctx;
                if args.client_input.get("name").is_some() {
                    ctx.push("has-name");
                }
                next.run(ctx).await
            },
        );
        let chain = MiddlewareChain::new().with(boxed(middleware));

        let result = chain
            .execute(
                Box::new(Vec::<&'static str>::new()),
                Invocation::detached(json!({ "name": "Alice" })),
                echo_terminal(),
            )
            .await
            .unwrap();

        assert_eq!(result, ActionResult::Data(json!(["has-name"])));
    }
}
