use praxis::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clients::{action_client, RequestLog};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    pub id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

pub fn action() -> Action<UserQuery, User> {
    action_client()
        .metadata(Metadata::new().with("actionName", "get-user"))
        .schema::<UserQuery>(Shape::object([("id", Shape::integer().min(1))]))
        .action(|args: HandlerArgs<RequestLog, UserQuery>| async move {
            match args.parsed_input.id {
                1 => Ok(User {
                    id: 1,
                    name: "Ada Lovelace".to_string(),
                }),
                _ => Err(ActionError::new("User not found").into()),
            }
        })
}
