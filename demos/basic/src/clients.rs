//! Base builder shared by every demo action.

use std::time::Instant;

use praxis::prelude::*;

/// Context produced by the request-log middleware.
#[derive(Debug, Clone)]
pub struct RequestLog {
    /// Request ID of the triggering event.
    pub request_id: String,
}

/// Builder with request logging applied.
pub fn action_client() -> ActionBuilder<RequestLog, Value, String> {
    create_safe_action_client().use_fn(
        "request-log",
        |args: MiddlewareArgs<EmptyContext>, next: Next<RequestLog>| async move {
            let started = Instant::now();
            let ctx = RequestLog {
                request_id: args.event.request_id().to_string(),
            };
            let result = next.run(ctx).await;
            tracing::info!(
                action = args.metadata.action_name().unwrap_or("anonymous"),
                elapsed = ?started.elapsed(),
                "Action finished"
            );
            result
        },
    )
}
