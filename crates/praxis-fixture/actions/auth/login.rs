use praxis::prelude::*;

use crate::model::{Credentials, Session};

pub fn action() -> Action<Credentials, Session> {
    create_safe_action_client()
        .metadata(Metadata::new().with("actionName", "auth/login"))
        .schema::<Credentials>(Shape::object([
            ("email", Shape::string().email()),
            ("password", Shape::string().min_length(1)),
        ]))
        .action(|args: HandlerArgs<EmptyContext, Credentials>| async move {
            let Credentials { email, password } = args.parsed_input;
            if password != "hunter2" {
                return return_validation_errors(
                    ValidationErrors::new().with("password", "Incorrect password"),
                );
            }
            Ok(Session {
                token: format!("session-{email}"),
            })
        })
}
