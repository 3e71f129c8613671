use praxis::prelude::*;

pub fn action() -> Action<Value, String> {
    create_safe_action_client()
        .action(|_args: HandlerArgs<EmptyContext, Value>| async move { Ok("pong".to_string()) })
}
