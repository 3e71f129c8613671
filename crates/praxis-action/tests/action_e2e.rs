//! End-to-end action execution tests.
//!
//! These tests drive complete actions through `Action::execute` and check the
//! wire shape of every outcome kind:
//!
//! 1. Input validation
//! 2. Explicit validation and server errors
//! 3. Unclassified failures with and without a translator
//! 4. Output validation
//! 5. Middleware context threading and contract violations

use std::sync::{Arc, Mutex};

use praxis_action::{
    create_safe_action_client, create_safe_action_client_with, ClientOptions, HandlerArgs,
};
use praxis_core::{
    return_validation_errors, ActionError, ActionEvent, ActionFailure, ActionResult, Metadata,
    Shape, ValidationErrors, MIDDLEWARE_DID_NOT_CALL_NEXT,
};
use praxis_middleware::{EmptyContext, MiddlewareArgs, Next};
use proptest::prelude::*;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
struct GreetInput {
    name: String,
}

fn greet_schema() -> Shape {
    Shape::object([(
        "name",
        Shape::string().min_length(1).message("Name is required"),
    )])
}

async fn run<I, O>(action: &praxis_action::Action<I, O>, input: Value) -> Value
where
    I: serde::de::DeserializeOwned + Send + 'static,
    O: serde::Serialize + Send + 'static,
{
    let result = action.execute(input, ActionEvent::detached()).await;
    serde_json::to_value(result).unwrap()
}

#[tokio::test]
async fn greet_returns_data() {
    let greet = create_safe_action_client()
        .schema::<GreetInput>(greet_schema())
        .action(|args: HandlerArgs<EmptyContext, GreetInput>| async move {
            Ok(format!("Hello, {}!", args.parsed_input.name))
        });

    assert_eq!(
        run(&greet, json!({ "name": "Alice" })).await,
        json!({ "data": "Hello, Alice!" })
    );
}

#[tokio::test]
async fn empty_name_returns_validation_errors_only() {
    let greet = create_safe_action_client()
        .schema::<GreetInput>(greet_schema())
        .action(|args: HandlerArgs<EmptyContext, GreetInput>| async move {
            Ok(format!("Hello, {}!", args.parsed_input.name))
        });

    let body = run(&greet, json!({ "name": "" })).await;
    assert_eq!(
        body,
        json!({ "validationErrors": { "name": ["Name is required"] } })
    );
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn missing_input_fails_validation() {
    let greet = create_safe_action_client()
        .schema::<GreetInput>(greet_schema())
        .action(|args: HandlerArgs<EmptyContext, GreetInput>| async move {
            Ok(args.parsed_input.name)
        });

    let body = run(&greet, Value::Null).await;
    assert_eq!(
        body,
        json!({ "validationErrors": { "_root": ["Expected object, received null"] } })
    );
}

#[tokio::test]
async fn explicit_server_error_keeps_message() {
    let action = create_safe_action_client()
        .action(|_args: HandlerArgs<EmptyContext, Value>| async move {
            Err::<(), _>(ActionError::new("Not enough credits").into())
        });

    assert_eq!(
        run(&action, Value::Null).await,
        json!({ "serverError": "Not enough credits" })
    );
}

#[tokio::test]
async fn explicit_errors_from_anyhow_helpers_keep_their_kind() {
    async fn debit(amount: u32) -> anyhow::Result<u32> {
        if amount > 10 {
            return Err(ActionError::new("Not enough credits").into());
        }
        Ok(10 - amount)
    }

    let action = create_safe_action_client_with(ClientOptions::with_error_handler(
        |_err: &anyhow::Error| "translated".to_string(),
    ))
    .action(|args: HandlerArgs<EmptyContext, Value>| async move {
        let amount = args.parsed_input.as_u64().unwrap_or_default() as u32;
        Ok::<_, ActionFailure>(debit(amount).await?)
    });

    assert_eq!(
        run(&action, json!(50)).await,
        json!({ "serverError": "Not enough credits" })
    );
    assert_eq!(run(&action, json!(4)).await, json!({ "data": 6 }));
}

#[tokio::test]
async fn panicking_input_schema_becomes_server_error() {
    let action = create_safe_action_client()
        .schema::<Value>(praxis_core::schema_fn(|_: &Value| -> Result<Value, ValidationErrors> {
            panic!("schema bug")
        }))
        .action(|_args: HandlerArgs<EmptyContext, Value>| async move { Ok(true) });

    let handle = tokio::spawn(async move { run(&action, json!({})).await });
    let body = handle.await.expect("execute must not panic outward");
    assert_eq!(body, json!({ "serverError": "An unexpected error occurred" }));
}

#[tokio::test]
async fn explicit_server_error_bypasses_translator() {
    let action = create_safe_action_client_with(ClientOptions::with_error_handler(
        |_err: &anyhow::Error| "translated".to_string(),
    ))
    .action(|_args: HandlerArgs<EmptyContext, Value>| async move {
        Err::<(), _>(ActionFailure::server("Not enough credits"))
    });

    assert_eq!(
        run(&action, Value::Null).await,
        json!({ "serverError": "Not enough credits" })
    );
}

#[tokio::test]
async fn explicit_validation_error_from_handler() {
    #[derive(Debug, Deserialize)]
    struct Register {
        email: String,
    }

    let action = create_safe_action_client()
        .schema::<Register>(Shape::object([("email", Shape::string().email())]))
        .action(|args: HandlerArgs<EmptyContext, Register>| async move {
            if args.parsed_input.email == "taken@example.com" {
                return return_validation_errors(
                    ValidationErrors::new().with("email", "This email is already taken"),
                );
            }
            Ok(true)
        });

    assert_eq!(
        run(&action, json!({ "email": "taken@example.com" })).await,
        json!({ "validationErrors": { "email": ["This email is already taken"] } })
    );
    assert_eq!(
        run(&action, json!({ "email": "free@example.com" })).await,
        json!({ "data": true })
    );
}

#[tokio::test]
async fn unexpected_error_uses_translator_or_generic_message() {
    let failing = |_args: HandlerArgs<EmptyContext, Value>| async move {
        Err::<(), _>(anyhow::anyhow!("Database connection refused").into())
    };

    let translated = create_safe_action_client_with(ClientOptions::with_error_handler(
        |err: &anyhow::Error| err.to_string(),
    ))
    .action(failing);
    assert_eq!(
        run(&translated, Value::Null).await,
        json!({ "serverError": "Database connection refused" })
    );

    let generic = create_safe_action_client().action(failing);
    assert_eq!(
        run(&generic, Value::Null).await,
        json!({ "serverError": "An unexpected error occurred" })
    );
}

#[tokio::test]
async fn output_schema_violation_is_server_error() {
    #[derive(Debug, Deserialize)]
    struct Doubling {
        value: i64,
    }

    let action = create_safe_action_client()
        .schema::<Doubling>(Shape::object([("value", Shape::integer())]))
        .output_schema(Shape::object([("doubled", Shape::integer().max(100))]))
        .action(|args: HandlerArgs<EmptyContext, Doubling>| async move {
            Ok(json!({ "doubled": args.parsed_input.value * 2 }))
        });

    assert_eq!(
        run(&action, json!({ "value": 5 })).await,
        json!({ "data": { "doubled": 10 } })
    );

    let body = run(&action, json!({ "value": 100 })).await;
    assert!(body.get("data").is_none());
    let message = body["serverError"].as_str().unwrap();
    assert!(message.starts_with("Output validation failed: "));
    assert!(message.contains("Number must be less than or equal to 100"));
}

#[derive(Debug, Clone, PartialEq)]
struct RequestInfo {
    request_id: String,
    timestamp: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct AuthedRequest {
    info: RequestInfo,
    role: String,
}

#[tokio::test]
async fn middleware_threads_context_to_handler() {
    let seen_by_second = Arc::new(Mutex::new(None));
    let seen = Arc::clone(&seen_by_second);

    let action = create_safe_action_client()
        .use_fn(
            "request-info",
            |_args: MiddlewareArgs<EmptyContext>, next: Next<RequestInfo>| async move {
                next.run(RequestInfo {
                    request_id: "req-123".to_string(),
                    timestamp: 1000,
                })
                .await
            },
        )
        .use_fn(
            "role",
            move |args: MiddlewareArgs<RequestInfo>, next: Next<AuthedRequest>| {
                let seen = Arc::clone(&seen);
                async move {
                    *seen.lock().unwrap() = Some(args.ctx.clone());
                    next.run(AuthedRequest {
                        info: args.ctx,
                        role: "admin".to_string(),
                    })
                    .await
                }
            },
        )
        .action(|args: HandlerArgs<AuthedRequest, Value>| async move {
            Ok(json!({
                "requestId": args.ctx.info.request_id,
                "timestamp": args.ctx.info.timestamp,
                "role": args.ctx.role,
            }))
        });

    assert_eq!(
        run(&action, Value::Null).await,
        json!({ "data": { "requestId": "req-123", "timestamp": 1000, "role": "admin" } })
    );
    assert_eq!(
        *seen_by_second.lock().unwrap(),
        Some(RequestInfo {
            request_id: "req-123".to_string(),
            timestamp: 1000
        })
    );
}

#[tokio::test]
async fn middleware_reads_metadata() {
    let action = create_safe_action_client()
        .metadata(Metadata::new().with("actionName", "with-metadata"))
        .use_fn(
            "name",
            |args: MiddlewareArgs<EmptyContext>, next: Next<String>| async move {
                let name = args.metadata.action_name().unwrap_or_default().to_string();
                next.run(name).await
            },
        )
        .action(|args: HandlerArgs<String, Value>| async move { Ok(args.ctx) });

    assert_eq!(action.name(), Some("with-metadata"));
    assert_eq!(
        run(&action, Value::Null).await,
        json!({ "data": "with-metadata" })
    );
}

#[tokio::test]
async fn middleware_without_next_is_contract_violation() {
    let action = create_safe_action_client_with(ClientOptions::with_error_handler(
        |_err: &anyhow::Error| "translated".to_string(),
    ))
    .use_fn(
        "forgetful",
        |_args: MiddlewareArgs<EmptyContext>, _next: Next<EmptyContext>| async move {
            Ok(ActionResult::Data(json!("ignored")))
        },
    )
    .action(|_args: HandlerArgs<EmptyContext, Value>| async move { Ok("unreachable") });

    assert_eq!(
        run(&action, Value::Null).await,
        json!({ "serverError": MIDDLEWARE_DID_NOT_CALL_NEXT })
    );
}

#[tokio::test]
async fn middleware_can_recover_from_inner_failure() {
    let action = create_safe_action_client()
        .use_fn(
            "fallback",
            |args: MiddlewareArgs<EmptyContext>, next: Next<EmptyContext>| async move {
                match next.run(args.ctx).await {
                    Err(ActionFailure::Unexpected(_)) => Ok(ActionResult::Data(json!("fallback"))),
                    other => other,
                }
            },
        )
        .action(|_args: HandlerArgs<EmptyContext, Value>| async move {
            Err::<(), _>(ActionFailure::unexpected_msg("flaky"))
        });

    assert_eq!(run(&action, Value::Null).await, json!({ "data": "fallback" }));
}

#[tokio::test]
async fn input_rejection_skips_middleware() {
    let visited = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&visited);

    let action = create_safe_action_client()
        .schema::<GreetInput>(greet_schema())
        .use_fn(
            "spy",
            move |args: MiddlewareArgs<EmptyContext>, next: Next<EmptyContext>| {
                let flag = Arc::clone(&flag);
                async move {
                    *flag.lock().unwrap() = true;
                    next.run(args.ctx).await
                }
            },
        )
        .action(|args: HandlerArgs<EmptyContext, GreetInput>| async move {
            Ok(args.parsed_input.name)
        });

    let body = run(&action, json!({ "name": "" })).await;
    assert!(body.get("validationErrors").is_some());
    assert!(!*visited.lock().unwrap());
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn input_passes_through_without_schema(input in arb_json()) {
        let echo = create_safe_action_client()
            .action(|args: HandlerArgs<EmptyContext, Value>| async move { Ok(args.parsed_input) });

        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let result = runtime.block_on(echo.execute(input.clone(), ActionEvent::detached()));
        prop_assert_eq!(result, ActionResult::Data(input));
    }
}
