//! Immutable action builder.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use praxis_core::{ActionFailure, ErrorTranslator, Metadata, Schema};
use praxis_middleware::{
    boxed, EmptyContext, FnMiddleware, Middleware, MiddlewareArgs, MiddlewareChain,
    MiddlewareResult, Next,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::action::{Action, HandlerArgs};

/// Builds an [`Action`] one configuration step at a time.
///
/// Every step borrows the current snapshot and returns a new one; nothing is
/// ever mutated in place. `Ctx` is the context the next middleware (or the
/// handler) will receive and `I` the handler's input type.
pub struct ActionBuilder<Ctx = EmptyContext, I = Value, E = String> {
    pub(crate) chain: MiddlewareChain<E>,
    pub(crate) input_schema: Option<Arc<dyn Schema>>,
    pub(crate) output_schema: Option<Arc<dyn Schema>>,
    pub(crate) metadata: Arc<Metadata>,
    pub(crate) translator: Option<ErrorTranslator<E>>,
    _types: PhantomData<fn() -> (Ctx, I)>,
}

impl<Ctx, I, E> Clone for ActionBuilder<Ctx, I, E> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
            input_schema: self.input_schema.clone(),
            output_schema: self.output_schema.clone(),
            metadata: Arc::clone(&self.metadata),
            translator: self.translator.clone(),
            _types: PhantomData,
        }
    }
}

impl<E> ActionBuilder<EmptyContext, Value, E>
where
    E: From<String> + Send + Sync + 'static,
{
    pub(crate) fn new(translator: Option<ErrorTranslator<E>>) -> Self {
        Self {
            chain: MiddlewareChain::new(),
            input_schema: None,
            output_schema: None,
            metadata: Arc::new(Metadata::new()),
            translator,
            _types: PhantomData,
        }
    }
}

impl<Ctx, I, E> ActionBuilder<Ctx, I, E>
where
    Ctx: Send + 'static,
    I: DeserializeOwned + Send + 'static,
    E: From<String> + Send + Sync + 'static,
{
    fn rebuild<Ctx2, I2>(&self, chain: MiddlewareChain<E>) -> ActionBuilder<Ctx2, I2, E> {
        ActionBuilder {
            chain,
            input_schema: self.input_schema.clone(),
            output_schema: self.output_schema.clone(),
            metadata: Arc::clone(&self.metadata),
            translator: self.translator.clone(),
            _types: PhantomData,
        }
    }

    /// Sets the input schema and the handler's input type.
    ///
    /// Raw input is parsed with `schema` and the result deserialized into
    /// `I2` before any middleware runs.
    pub fn schema<I2>(&self, schema: impl Schema) -> ActionBuilder<Ctx, I2, E>
    where
        I2: DeserializeOwned + Send + 'static,
    {
        let mut next = self.rebuild::<Ctx, I2>(self.chain.clone());
        next.input_schema = Some(Arc::new(schema));
        next
    }

    /// Sets the output schema applied to the handler's return value.
    pub fn output_schema(&self, schema: impl Schema) -> Self {
        let mut next = self.clone();
        next.output_schema = Some(Arc::new(schema));
        next
    }

    /// Appends a middleware. Downstream steps see the context it passes to `next`.
    pub fn use_middleware<Ctx2, M>(&self, middleware: M) -> ActionBuilder<Ctx2, I, E>
    where
        M: Middleware<Ctx, Ctx2, E>,
        Ctx2: Send + 'static,
    {
        let chain = self.chain.with(boxed::<M, Ctx, Ctx2, E>(middleware));
        self.rebuild(chain)
    }

    /// Appends an async closure as a named middleware.
    pub fn use_fn<Ctx2, F, Fut>(&self, name: &'static str, f: F) -> ActionBuilder<Ctx2, I, E>
    where
        F: Fn(MiddlewareArgs<Ctx>, Next<Ctx2, E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MiddlewareResult<E>> + Send + 'static,
        Ctx2: Send + 'static,
    {
        self.use_middleware(FnMiddleware::new(name, f))
    }

    /// Shallow-merges `metadata` into the current metadata; later keys win.
    pub fn metadata(&self, metadata: impl Into<Metadata>) -> Self {
        let mut next = self.clone();
        next.metadata = Arc::new(self.metadata.merge(&metadata.into()));
        next
    }

    /// Returns the metadata accumulated so far.
    pub fn current_metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the names of the middleware registered so far.
    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.chain.stage_names()
    }

    /// Finalizes the builder with `handler`.
    pub fn action<O, H, Fut>(self, handler: H) -> Action<I, O, E>
    where
        H: Fn(HandlerArgs<Ctx, I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ActionFailure>> + Send + 'static,
        O: Serialize + Send + 'static,
    {
        Action::from_builder(self, handler)
    }
}

impl<Ctx, I, E: 'static> std::fmt::Debug for ActionBuilder<Ctx, I, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionBuilder")
            .field("middleware", &self.chain)
            .field("has_input_schema", &self.input_schema.is_some())
            .field("has_output_schema", &self.output_schema.is_some())
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::create_safe_action_client;
    use praxis_core::Shape;

    #[test]
    fn test_debug_lists_middleware() {
        let builder = create_safe_action_client().use_fn(
            "audit",
            |args: MiddlewareArgs<EmptyContext>, next: Next<EmptyContext>| async move {
                next.run(args.ctx).await
            },
        );
        assert!(format!("{builder:?}").contains("\"audit\""));

        let action = builder.action(|_args: HandlerArgs<EmptyContext, Value>| async move { Ok(1) });
        let debug = format!("{action:?}");
        assert!(debug.starts_with("Action"));
        assert!(debug.contains("\"audit\""));
    }

    #[test]
    fn test_steps_do_not_mutate_previous_snapshot() {
        let base = create_safe_action_client();
        let with_output = base.output_schema(Shape::any());
        let with_mw = base.use_fn(
            "noop",
            |args: MiddlewareArgs<EmptyContext>, next: Next<EmptyContext>| async move {
                next.run(args.ctx).await
            },
        );

        assert!(base.output_schema.is_none());
        assert!(with_output.output_schema.is_some());
        assert!(base.middleware_names().is_empty());
        assert_eq!(with_mw.middleware_names(), vec!["noop"]);
    }

    #[test]
    fn test_metadata_merges_shallowly() {
        let builder = create_safe_action_client()
            .metadata(Metadata::new().with("actionName", "a").with("tag", 1))
            .metadata(Metadata::new().with("actionName", "b"));

        assert_eq!(builder.current_metadata().action_name(), Some("b"));
        assert_eq!(
            builder.current_metadata().get("tag"),
            Some(&serde_json::json!(1))
        );
    }

    #[test]
    fn test_branches_share_prefix() {
        let authed = create_safe_action_client().use_fn(
            "auth",
            |_args: MiddlewareArgs<EmptyContext>, next: Next<u64>| async move { next.run(42).await },
        );
        let audited = authed.use_fn(
            "audit",
            |args: MiddlewareArgs<u64>, next: Next<u64>| async move { next.run(args.ctx).await },
        );

        assert_eq!(authed.middleware_names(), vec!["auth"]);
        assert_eq!(audited.middleware_names(), vec!["auth", "audit"]);
    }
}
