//! Middleware chain execution.
//!
//! The chain stores middleware with their context types erased so that a
//! single list can hold stages whose contexts differ. Each stage downcasts
//! its incoming context back to the type it was registered with; the builder
//! in `praxis-action` guarantees the types line up.
//!
//! The chain is built back to front around a terminal step (the handler):
//!
//! ```text
//! Next(mw1) ─▶ Next(mw2) ─▶ ... ─▶ Terminal
//! ```

use std::any::Any;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use praxis_core::{ActionEvent, ActionFailure, Metadata};
use serde_json::Value;

use crate::middleware::{BoxFuture, Middleware, MiddlewareArgs, MiddlewareResult, Next};

/// A context value with its type erased.
pub type ErasedContext = Box<dyn Any + Send>;

/// The innermost step of a chain, typically the handler.
pub type Terminal<E> = Box<dyn FnOnce(ErasedContext) -> BoxFuture<'static, MiddlewareResult<E>> + Send>;

/// A type-erased middleware that can be stored in a chain.
pub type BoxedMiddleware<E> = Arc<dyn ErasedMiddleware<E>>;

/// Per-invocation values shared by every stage of a chain.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Raw, unvalidated client input.
    pub client_input: Arc<Value>,
    /// Static metadata of the action.
    pub metadata: Arc<Metadata>,
    /// The request that triggered the action.
    pub event: ActionEvent,
}

impl Invocation {
    /// Creates an invocation.
    #[must_use]
    pub fn new(client_input: Value, metadata: Arc<Metadata>, event: ActionEvent) -> Self {
        Self {
            client_input: Arc::new(client_input),
            metadata,
            event,
        }
    }

    /// Creates an invocation with no metadata and a detached event.
    #[must_use]
    pub fn detached(client_input: Value) -> Self {
        Self::new(
            client_input,
            Arc::new(Metadata::new()),
            ActionEvent::detached(),
        )
    }
}

/// Object-safe form of [`Middleware`] operating on erased contexts.
pub trait ErasedMiddleware<E>: Send + Sync + 'static {
    /// Returns the middleware name.
    fn name(&self) -> &'static str;

    /// Processes the invocation with an erased context.
    fn call<'a>(
        &'a self,
        ctx: ErasedContext,
        invocation: &Invocation,
        next: ErasedNext<E>,
    ) -> BoxFuture<'a, MiddlewareResult<E>>;
}

struct Typed<M, CtxIn, CtxOut> {
    inner: M,
    _ctx: PhantomData<fn(CtxIn) -> CtxOut>,
}

impl<M, CtxIn, CtxOut, E> ErasedMiddleware<E> for Typed<M, CtxIn, CtxOut>
where
    M: Middleware<CtxIn, CtxOut, E>,
    CtxIn: Send + 'static,
    CtxOut: Send + 'static,
    E: Send + 'static,
{
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn call<'a>(
        &'a self,
        ctx: ErasedContext,
        invocation: &Invocation,
        next: ErasedNext<E>,
    ) -> BoxFuture<'a, MiddlewareResult<E>> {
        let ctx = match ctx.downcast::<CtxIn>() {
            Ok(ctx) => *ctx,
            Err(_) => {
                let name = self.inner.name();
                return Box::pin(async move {
                    Err(ActionFailure::unexpected_msg(format!(
                        "middleware `{name}` received a context of the wrong type"
                    )))
                });
            }
        };
        let args = MiddlewareArgs {
            ctx,
            client_input: Arc::clone(&invocation.client_input),
            metadata: Arc::clone(&invocation.metadata),
            event: invocation.event.clone(),
        };
        self.inner.process(args, Next::new(next))
    }
}

/// Erases a typed middleware so it can be stored in a [`MiddlewareChain`].
pub fn boxed<M, CtxIn, CtxOut, E>(middleware: M) -> BoxedMiddleware<E>
where
    M: Middleware<CtxIn, CtxOut, E>,
    CtxIn: Send + 'static,
    CtxOut: Send + 'static,
    E: Send + 'static,
{
    Arc::new(Typed {
        inner: middleware,
        _ctx: PhantomData,
    })
}

/// The erased continuation behind [`Next`].
pub struct ErasedNext<E> {
    inner: NextInner<E>,
    /// Set when this continuation is run; owned by the middleware that received it.
    called: Option<Arc<AtomicBool>>,
}

enum NextInner<E> {
    Stage {
        middleware: BoxedMiddleware<E>,
        invocation: Invocation,
        next: Box<ErasedNext<E>>,
    },
    Terminal(Terminal<E>),
}

impl<E: Send + 'static> ErasedNext<E> {
    fn stage(middleware: BoxedMiddleware<E>, invocation: Invocation, next: Self) -> Self {
        Self {
            inner: NextInner::Stage {
                middleware,
                invocation,
                next: Box::new(next),
            },
            called: None,
        }
    }

    fn terminal(terminal: Terminal<E>) -> Self {
        Self {
            inner: NextInner::Terminal(terminal),
            called: None,
        }
    }

    /// Runs this continuation with `ctx`.
    pub fn run(self, ctx: ErasedContext) -> BoxFuture<'static, MiddlewareResult<E>> {
        if let Some(called) = &self.called {
            called.store(true, Ordering::SeqCst);
        }

        match self.inner {
            NextInner::Terminal(terminal) => terminal(ctx),
            NextInner::Stage {
                middleware,
                invocation,
                next,
            } => Box::pin(async move {
                let called = Arc::new(AtomicBool::new(false));
                let mut next = *next;
                next.called = Some(Arc::clone(&called));

                tracing::trace!(middleware = middleware.name(), "entering middleware");
                let result = middleware.call(ctx, &invocation, next).await;

                match result {
                    Ok(_) if !called.load(Ordering::SeqCst) => {
                        tracing::warn!(
                            middleware = middleware.name(),
                            "middleware returned without calling next"
                        );
                        Err(ActionFailure::MiddlewareSkippedNext {
                            middleware: middleware.name(),
                        })
                    }
                    other => other,
                }
            }),
        }
    }
}

/// An ordered, immutable-by-convention list of middleware.
///
/// [`with`](MiddlewareChain::with) returns a new chain and leaves the
/// original untouched, so chains can be shared between action builders.
pub struct MiddlewareChain<E = String> {
    stages: Vec<BoxedMiddleware<E>>,
}

impl<E> Clone for MiddlewareChain<E> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
        }
    }
}

impl<E> Default for MiddlewareChain<E> {
    fn default() -> Self {
        Self { stages: Vec::new() }
    }
}

impl<E: Send + 'static> MiddlewareChain<E> {
    /// Creates an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new chain with `stage` appended.
    #[must_use]
    pub fn with(&self, stage: BoxedMiddleware<E>) -> Self {
        let mut stages = self.stages.clone();
        stages.push(stage);
        Self { stages }
    }

    /// Returns the names of all stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs every stage in order and then `terminal`.
    ///
    /// With no stages, `terminal` runs directly with `ctx`.
    pub async fn execute(
        &self,
        ctx: ErasedContext,
        invocation: Invocation,
        terminal: Terminal<E>,
    ) -> MiddlewareResult<E> {
        self.build_chain(invocation, terminal).run(ctx).await
    }

    fn build_chain(&self, invocation: Invocation, terminal: Terminal<E>) -> ErasedNext<E> {
        let mut next = ErasedNext::terminal(terminal);
        for stage in self.stages.iter().rev() {
            next = ErasedNext::stage(Arc::clone(stage), invocation.clone(), next);
        }
        next
    }
}

impl<E: 'static> std::fmt::Debug for MiddlewareChain<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|stage| stage.name()))
            .finish()
    }
}
