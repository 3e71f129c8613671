//! Mounts the actions discovered under `server/actions/` and calls them
//! in-process through their generated references.

use anyhow::Result;
use praxis::client::{ActionClient, ActionErrorPayload};
use praxis::config::ConfigLoader;

mod clients;

#[allow(dead_code, clippy::all, clippy::pedantic, clippy::nursery)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/praxis/mod.rs"));
}

use generated::actions::auth_login::LoginInput;
use generated::actions::get_user::UserQuery;
use generated::actions::greet::GreetInput;
use generated::{handlers, references};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigLoader::new()
        .with_development()
        .with_optional_file("praxis.toml")?
        .with_dotenv()
        .with_env_prefix("PRAXIS")
        .load()?;

    praxis::telemetry::init_logging(&config.telemetry.log_config())?;
    praxis::telemetry::metrics::describe_metrics();

    let router = handlers::router_with_prefix(&config.server.route_prefix);
    for name in router.names() {
        tracing::info!(action = name, path = %router.path_for(name), "Mounted action");
    }
    let client = ActionClient::local(router);

    let greeting = client
        .call(references::greet, &GreetInput { name: "Ada".to_string() })
        .await?;
    tracing::info!(result = ?greeting, "Called greet");

    let get_user = client
        .use_action(references::getUser)
        .on_success(|user, query| tracing::info!(id = query.id, name = %user.name, "Loaded user"))
        .on_error(|error, query| match error {
            ActionErrorPayload::ServerError(message) => {
                tracing::warn!(id = query.id, %message, "User lookup failed");
            }
            ActionErrorPayload::ValidationErrors(errors) => {
                tracing::warn!(id = query.id, ?errors, "User lookup rejected");
            }
        });

    get_user.execute_async(UserQuery { id: 1 }).await;
    get_user.execute_async(UserQuery { id: 99 }).await;
    tracing::info!(
        status = %get_user.status(),
        data = ?get_user.data(),
        error = ?get_user.server_error(),
        "User lookup settled"
    );

    let login = client
        .call(
            references::authLogin,
            &LoginInput {
                email: "ada@example.com".to_string(),
                password: "guess".to_string(),
            },
        )
        .await?;
    tracing::info!(result = ?login, "Called auth/login");

    Ok(())
}
