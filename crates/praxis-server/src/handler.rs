//! Type-erased action handlers.
//!
//! An [`ActionHandler`] wraps a typed [`Action`] behind a uniform
//! `(input, event) -> JSON` signature so that actions with different input,
//! output and server error types can share one router.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use http::request::Parts;
use praxis_action::Action;
use praxis_core::{ActionEvent, DEFAULT_SERVER_ERROR_MESSAGE};
use praxis_middleware::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::input::{read_body_input, read_query_input};

/// Where a handler reads its raw input from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// JSON request body.
    Body,
    /// JSON in the `input` query parameter.
    Query,
}

type ErasedInvoke = Arc<dyn Fn(Value, ActionEvent) -> BoxFuture<'static, Value> + Send + Sync>;

/// A type-erased action entry point.
#[derive(Clone)]
pub struct ActionHandler {
    source: InputSource,
    name: Option<String>,
    invoke: ErasedInvoke,
}

impl ActionHandler {
    fn new<I, O, E>(action: Action<I, O, E>, source: InputSource) -> Self
    where
        I: DeserializeOwned + Send + 'static,
        O: Serialize + Send + 'static,
        E: From<String> + Serialize + Send + Sync + 'static,
    {
        let name = action.name().map(str::to_string);
        let invoke: ErasedInvoke = Arc::new(
            move |input: Value, event: ActionEvent| -> BoxFuture<'static, Value> {
                let action = action.clone();
                Box::pin(async move { encode(action.execute(input, event).await) })
            },
        );

        Self {
            source,
            name,
            invoke,
        }
    }

    /// Returns where this handler reads its input from.
    pub fn input_source(&self) -> InputSource {
        self.source
    }

    /// Returns the action name from its metadata, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Runs the action with already extracted input.
    ///
    /// The returned value is the serialized `ActionResult`.
    pub fn invoke(&self, input: Value, event: ActionEvent) -> BoxFuture<'static, Value> {
        (self.invoke)(input, event)
    }

    /// Extracts input from the request and runs the action.
    pub fn handle(&self, parts: &Parts, body: &Bytes) -> BoxFuture<'static, Value> {
        let input = match self.source {
            InputSource::Body => read_body_input(body),
            InputSource::Query => read_query_input(&parts.uri),
        };
        self.invoke(input, ActionEvent::from_parts(parts))
    }
}

impl fmt::Debug for ActionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHandler")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn encode<E: Serialize>(result: praxis_core::ActionResult<Value, E>) -> Value {
    match serde_json::to_value(&result) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize action result");
            serde_json::json!({ "serverError": DEFAULT_SERVER_ERROR_MESSAGE })
        }
    }
}

/// Wraps an action whose input arrives in the request body.
///
/// Used for POST, PUT, PATCH and DELETE routes.
pub fn body_handler<I, O, E>(action: Action<I, O, E>) -> ActionHandler
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    E: From<String> + Serialize + Send + Sync + 'static,
{
    ActionHandler::new(action, InputSource::Body)
}

/// Wraps an action whose input arrives in the `input` query parameter.
///
/// Used for GET routes.
pub fn query_handler<I, O, E>(action: Action<I, O, E>) -> ActionHandler
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    E: From<String> + Serialize + Send + Sync + 'static,
{
    ActionHandler::new(action, InputSource::Query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_action::{create_safe_action_client, HandlerArgs};
    use praxis_middleware::EmptyContext;
    use serde_json::json;

    fn echo() -> Action<Value, Value> {
        create_safe_action_client()
            .action(|args: HandlerArgs<EmptyContext, Value>| async move { Ok(args.parsed_input) })
    }

    #[tokio::test]
    async fn test_body_handler_reads_body() {
        let handler = body_handler(echo());
        let (parts, ()) = http::Request::post("/api/_actions/echo")
            .body(())
            .unwrap()
            .into_parts();

        let result = handler
            .handle(&parts, &Bytes::from_static(br#"{"a":1}"#))
            .await;
        assert_eq!(result, json!({ "data": { "a": 1 } }));
    }

    #[tokio::test]
    async fn test_query_handler_ignores_body() {
        let handler = query_handler(echo());
        assert_eq!(handler.input_source(), InputSource::Query);

        let (parts, ()) = http::Request::get("/api/_actions/echo?input=%5B1%2C2%5D")
            .body(())
            .unwrap()
            .into_parts();
        let result = handler
            .handle(&parts, &Bytes::from_static(br#"{"ignored":true}"#))
            .await;
        assert_eq!(result, json!({ "data": [1, 2] }));
    }

    #[tokio::test]
    async fn test_malformed_body_becomes_null_input() {
        let handler = body_handler(echo());
        let (parts, ()) = http::Request::post("/").body(()).unwrap().into_parts();
        let result = handler.handle(&parts, &Bytes::from_static(b"{oops")).await;
        assert_eq!(result, json!({ "data": null }));
    }

    #[test]
    fn test_name_comes_from_metadata() {
        let action = create_safe_action_client()
            .metadata(praxis_core::Metadata::new().with("actionName", "echo"))
            .action(|args: HandlerArgs<EmptyContext, Value>| async move { Ok(args.parsed_input) });
        assert_eq!(body_handler(action).name(), Some("echo"));
    }
}
