use praxis::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clients::{action_client, RequestLog};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
}

pub fn action() -> Action<LoginInput, Session> {
    action_client()
        .metadata(Metadata::new().with("actionName", "auth/login"))
        .schema::<LoginInput>(Shape::object([
            ("email", Shape::string().email().message("Enter a valid email")),
            ("password", Shape::string().min_length(8)),
        ]))
        .action(|args: HandlerArgs<RequestLog, LoginInput>| async move {
            let input = args.parsed_input;
            if input.password != "correct horse" {
                return return_validation_errors(
                    ValidationErrors::new().with("password", "Incorrect password"),
                );
            }
            Ok(Session {
                token: format!("{}:{}", input.email, args.ctx.request_id),
            })
        })
}
