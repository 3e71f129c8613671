//! Transport-bound client.

use std::sync::Arc;

use praxis_core::{ActionResult, SafeActionReference};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TransportError;
use crate::transport::{HttpTransport, LocalTransport, Transport};
use crate::use_action::UseAction;

/// Calls actions through a shared transport.
///
/// ```
/// use praxis_client::ActionClient;
/// use praxis_core::{HttpMethod, SafeActionReference};
///
/// const GREET: SafeActionReference<String, String> =
///     SafeActionReference::new("greet", HttpMethod::Post);
///
/// let client = ActionClient::http("http://localhost:3000");
/// let greet = client.use_action(GREET);
/// assert!(greet.is_idle());
/// ```
#[derive(Clone)]
pub struct ActionClient {
    transport: Arc<dyn Transport>,
}

impl ActionClient {
    /// Creates a client over any transport.
    pub fn new(transport: impl Transport) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// Creates a client talking HTTP to `base_url`.
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(base_url))
    }

    /// Creates a client dispatching into an in-process router.
    pub fn local(router: praxis_server::ActionRouter) -> Self {
        Self::new(LocalTransport::new(router))
    }

    /// Returns the shared transport.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    /// Creates a stateful wrapper for one action.
    pub fn use_action<I, O, E>(&self, reference: SafeActionReference<I, O, E>) -> UseAction<I, O, E>
    where
        I: Serialize + Send + Sync + 'static,
        O: DeserializeOwned + Clone + Send + Sync + 'static,
        E: DeserializeOwned + From<String> + Clone + Send + Sync + 'static,
    {
        UseAction::new(reference, self.transport())
    }

    /// Calls an action once without tracking state.
    ///
    /// Unlike [`UseAction::execute_async`], transport failures are returned
    /// as errors rather than folded into the result.
    pub async fn call<I, O, E>(
        &self,
        reference: SafeActionReference<I, O, E>,
        input: &I,
    ) -> Result<ActionResult<O, E>, TransportError>
    where
        I: Serialize,
        O: DeserializeOwned,
        E: DeserializeOwned,
    {
        let input = serde_json::to_value(input).map_err(TransportError::Encode)?;
        let raw = self
            .transport
            .invoke(reference.path(), reference.method(), input)
            .await?;
        serde_json::from_value(raw).map_err(TransportError::Decode)
    }
}

impl std::fmt::Debug for ActionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionClient").finish_non_exhaustive()
    }
}
