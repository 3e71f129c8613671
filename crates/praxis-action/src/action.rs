//! Executable actions and the execution engine.
//!
//! Every invocation runs the same fixed sequence:
//!
//! 1. Input validation (short-circuits with `validationErrors`)
//! 2. Middleware chain around the handler
//! 3. Output validation, inside the innermost chain step
//! 4. Failure classification into exactly one [`ActionResult`] variant

use std::any::Any;
use std::future::Future;
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use futures_util::FutureExt;
use praxis_core::schema::{deserialize_value, parse_typed};
use praxis_core::{
    map_failure, ActionEvent, ActionFailure, ActionResult, ActionTypes, ErrorTranslator,
    FailureKind, Metadata, Schema, ValidationErrors,
};
use praxis_middleware::{
    BoxFuture, EmptyContext, ErasedContext, Invocation, MiddlewareChain, MiddlewareResult,
    Terminal,
};
use praxis_telemetry::metrics::ACTION_RESULTS_TOTAL;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::Instrument;

use crate::builder::ActionBuilder;

/// Arguments handed to an action handler.
#[derive(Debug, Clone)]
pub struct HandlerArgs<Ctx, I> {
    /// Input after schema validation.
    pub parsed_input: I,
    /// Context produced by the last middleware.
    pub ctx: Ctx,
    /// The request that triggered the action.
    pub event: ActionEvent,
}

type BoxedHandler<I, O> =
    Box<dyn Fn(ErasedContext, I, ActionEvent) -> BoxFuture<'static, Result<O, ActionFailure>> + Send + Sync>;

struct Inner<I, O, E> {
    chain: MiddlewareChain<E>,
    input_schema: Option<Arc<dyn Schema>>,
    output_schema: Option<Arc<dyn Schema>>,
    metadata: Arc<Metadata>,
    translator: Option<ErrorTranslator<E>>,
    handler: BoxedHandler<I, O>,
}

/// A finalized, immutable action.
///
/// Cloning is cheap and every clone shares the same configuration.
/// [`execute`](Action::execute) is the single entry point used by
/// generated handlers.
pub struct Action<I, O, E = String> {
    inner: Arc<Inner<I, O, E>>,
    _types: PhantomData<fn(I) -> (O, E)>,
}

impl<I, O, E> Clone for Action<I, O, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _types: PhantomData,
        }
    }
}

impl<I, O, E> ActionTypes for Action<I, O, E> {
    type Input = I;
    type Output = O;
    type ServerError = E;
}

impl<I, O, E> Action<I, O, E>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    E: From<String> + Send + Sync + 'static,
{
    pub(crate) fn from_builder<Ctx, H, Fut>(builder: ActionBuilder<Ctx, I, E>, handler: H) -> Self
    where
        Ctx: Send + 'static,
        H: Fn(HandlerArgs<Ctx, I>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ActionFailure>> + Send + 'static,
    {
        let handler: BoxedHandler<I, O> = Box::new(
            move |ctx: ErasedContext,
                  parsed_input: I,
                  event: ActionEvent|
                  -> BoxFuture<'static, Result<O, ActionFailure>> {
                match ctx.downcast::<Ctx>() {
                    Ok(ctx) => Box::pin(handler(HandlerArgs {
                        parsed_input,
                        ctx: *ctx,
                        event,
                    })),
                    Err(_) => Box::pin(async {
                        Err(ActionFailure::unexpected_msg(
                            "handler received a context of the wrong type",
                        ))
                    }),
                }
            },
        );

        Self {
            inner: Arc::new(Inner {
                chain: builder.chain,
                input_schema: builder.input_schema,
                output_schema: builder.output_schema,
                metadata: builder.metadata,
                translator: builder.translator,
                handler,
            }),
            _types: PhantomData,
        }
    }

    /// Returns the action's metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.inner.metadata
    }

    /// Returns the action name from the `actionName` metadata key, if set.
    pub fn name(&self) -> Option<&str> {
        self.inner.metadata.action_name()
    }

    /// Returns the names of the action's middleware in order.
    pub fn middleware_names(&self) -> Vec<&'static str> {
        self.inner.chain.stage_names()
    }

    /// Runs the action on untrusted input.
    ///
    /// Never fails and never panics outward: every failure, including a panic
    /// inside middleware or the handler, is mapped to a result variant.
    pub async fn execute(&self, raw_input: Value, event: ActionEvent) -> ActionResult<Value, E> {
        let span = tracing::debug_span!(
            "action",
            action = self.name().unwrap_or(""),
            request_id = %event.request_id(),
        );
        self.run(raw_input, event).instrument(span).await
    }

    async fn run(&self, raw_input: Value, event: ActionEvent) -> ActionResult<Value, E> {
        let parsed_input = match catch_unwind(AssertUnwindSafe(|| self.parse_input(&raw_input))) {
            Ok(Ok(input)) => input,
            Ok(Err(errors)) => {
                tracing::debug!(fields = errors.len(), "input rejected by schema");
                record(FailureKind::InputValidation.as_str());
                return ActionResult::ValidationErrors(errors);
            }
            Err(panic) => {
                return self.fail(ActionFailure::unexpected_msg(panic_message(panic.as_ref())))
            }
        };

        let invocation = Invocation::new(raw_input, Arc::clone(&self.inner.metadata), event.clone());
        let terminal = self.terminal(parsed_input, event);
        let outcome = AssertUnwindSafe(self.inner.chain.execute(
            Box::new(EmptyContext),
            invocation,
            terminal,
        ))
        .catch_unwind()
        .await;

        let failure = match outcome {
            Ok(Ok(result)) => {
                record(if result.is_data() { "success" } else { result.outcome() });
                return result;
            }
            Ok(Err(failure)) => failure,
            Err(panic) => ActionFailure::unexpected_msg(panic_message(panic.as_ref())),
        };
        self.fail(failure)
    }

    fn fail(&self, failure: ActionFailure) -> ActionResult<Value, E> {
        let kind = failure.kind();
        if kind.is_defect() {
            tracing::error!(kind = %kind, error = %failure, "action failed");
        } else {
            tracing::debug!(kind = %kind, error = %failure, "action returned an error");
        }
        record(kind.as_str());
        map_failure(failure, self.inner.translator.as_ref())
    }

    fn parse_input(&self, raw_input: &Value) -> Result<I, ValidationErrors> {
        match &self.inner.input_schema {
            Some(schema) => parse_typed(schema.as_ref(), raw_input),
            None => deserialize_value(raw_input.clone()),
        }
    }

    fn terminal(&self, parsed_input: I, event: ActionEvent) -> Terminal<E> {
        let inner = Arc::clone(&self.inner);
        Box::new(move |ctx: ErasedContext| -> BoxFuture<'static, MiddlewareResult<E>> {
            Box::pin(async move {
                let output = (inner.handler)(ctx, parsed_input, event).await?;
                let value = serde_json::to_value(&output).map_err(ActionFailure::unexpected)?;
                let value = match &inner.output_schema {
                    Some(schema) => schema.parse(&value).map_err(ActionFailure::OutputValidation)?,
                    None => value,
                };
                Ok(ActionResult::Data(value))
            })
        })
    }
}

impl<I, O, E> Action<I, O, E>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + DeserializeOwned + Send + 'static,
    E: From<String> + Send + Sync + 'static,
{
    /// Runs the action in-process with a typed input and decodes the output.
    ///
    /// Input that cannot be serialized, or output that cannot be decoded back
    /// into `O`, is reported as a server error.
    pub async fn call<T: Serialize>(&self, input: &T, event: ActionEvent) -> ActionResult<O, E> {
        let raw_input = match serde_json::to_value(input) {
            Ok(value) => value,
            Err(e) => return ActionResult::ServerError(E::from(e.to_string())),
        };
        match self.execute(raw_input, event).await {
            ActionResult::Data(value) => match serde_json::from_value(value) {
                Ok(output) => ActionResult::Data(output),
                Err(e) => ActionResult::ServerError(E::from(e.to_string())),
            },
            ActionResult::ValidationErrors(errors) => ActionResult::ValidationErrors(errors),
            ActionResult::ServerError(error) => ActionResult::ServerError(error),
        }
    }
}

impl<I, O, E: 'static> std::fmt::Debug for Action<I, O, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Action")
            .field("metadata", &self.inner.metadata)
            .field("middleware", &self.inner.chain)
            .finish_non_exhaustive()
    }
}

fn record(outcome: &'static str) {
    metrics::counter!(ACTION_RESULTS_TOTAL, "outcome" => outcome).increment(1);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "action panicked".to_string()
    }
}
