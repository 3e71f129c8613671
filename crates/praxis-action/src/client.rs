//! Builder factories.

use std::sync::Arc;

use praxis_core::ErrorTranslator;
use praxis_middleware::EmptyContext;
use serde_json::Value;

use crate::builder::ActionBuilder;

/// Global options applied to every action built from a client.
pub struct ClientOptions<E = String> {
    /// Converts unclassified failures into the server error value.
    ///
    /// Must be total; a translator that panics falls back to the generic
    /// message.
    pub handle_server_error: Option<ErrorTranslator<E>>,
}

impl<E> ClientOptions<E> {
    /// Creates options with a server error translator.
    pub fn with_error_handler<F>(handler: F) -> Self
    where
        F: Fn(&anyhow::Error) -> E + Send + Sync + 'static,
    {
        Self {
            handle_server_error: Some(Arc::new(handler)),
        }
    }
}

impl<E> Default for ClientOptions<E> {
    fn default() -> Self {
        Self {
            handle_server_error: None,
        }
    }
}

impl<E> std::fmt::Debug for ClientOptions<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientOptions")
            .field("handle_server_error", &self.handle_server_error.is_some())
            .finish()
    }
}

/// Creates a builder with `String` server errors and no translator.
///
/// Unclassified failures surface as
/// [`DEFAULT_SERVER_ERROR_MESSAGE`](praxis_core::DEFAULT_SERVER_ERROR_MESSAGE).
pub fn create_safe_action_client() -> ActionBuilder<EmptyContext, Value, String> {
    ActionBuilder::new(None)
}

/// Creates a builder with global options.
///
/// ```
/// use praxis_action::{create_safe_action_client_with, ClientOptions};
///
/// let client = create_safe_action_client_with(ClientOptions::with_error_handler(
///     |err: &anyhow::Error| err.to_string(),
/// ));
/// # let _ = client;
/// ```
pub fn create_safe_action_client_with<E>(
    options: ClientOptions<E>,
) -> ActionBuilder<EmptyContext, Value, E>
where
    E: From<String> + Send + Sync + 'static,
{
    ActionBuilder::new(options.handle_server_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::HandlerArgs;
    use praxis_core::{ActionEvent, ActionFailure, ActionResult, DEFAULT_SERVER_ERROR_MESSAGE};
    use serde_json::json;

    async fn fail_with(client: ActionBuilder<EmptyContext, Value, String>) -> ActionResult<Value> {
        client
            .action(|_args: HandlerArgs<EmptyContext, Value>| async move {
                Err::<(), _>(ActionFailure::unexpected_msg("Database connection refused"))
            })
            .execute(json!(null), ActionEvent::detached())
            .await
    }

    #[tokio::test]
    async fn test_translator_receives_unclassified_failures() {
        let client = create_safe_action_client_with(ClientOptions::with_error_handler(
            |err: &anyhow::Error| err.to_string(),
        ));
        assert_eq!(
            fail_with(client).await,
            ActionResult::ServerError("Database connection refused".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_translator_hides_details() {
        assert_eq!(
            fail_with(create_safe_action_client()).await,
            ActionResult::ServerError(DEFAULT_SERVER_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_options_debug_hides_closure() {
        let options = ClientOptions::<String>::default();
        assert_eq!(
            format!("{options:?}"),
            "ClientOptions { handle_server_error: false }"
        );
    }
}
