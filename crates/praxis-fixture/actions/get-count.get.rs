use praxis::prelude::*;

use crate::model::CountQuery;

pub fn action() -> Action<CountQuery, u64> {
    create_safe_action_client()
        .schema::<CountQuery>(Shape::object([("from", Shape::integer().min(0))]))
        .action(|args: HandlerArgs<EmptyContext, CountQuery>| async move {
            Ok(args.parsed_input.from + 1)
        })
}
