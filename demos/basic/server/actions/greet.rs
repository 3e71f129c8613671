use praxis::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clients::{action_client, RequestLog};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetInput {
    pub name: String,
}

pub fn action() -> Action<GreetInput, String> {
    action_client()
        .metadata(Metadata::new().with("actionName", "greet"))
        .schema::<GreetInput>(Shape::object([(
            "name",
            Shape::string().min_length(1).message("Name is required"),
        )]))
        .action(|args: HandlerArgs<RequestLog, GreetInput>| async move {
            Ok(format!("Hello, {}!", args.parsed_input.name))
        })
}
