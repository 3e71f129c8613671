//! Reactive action invocation.
//!
//! [`UseAction`] wraps a typed reference and a transport. Every call moves
//! the shared state through `idle → executing → hasSucceeded | hasErrored`
//! and fires the lifecycle callbacks in order:
//! `on_execute → on_success | on_error → on_settled`.
//!
//! Concurrent calls are not debounced. Each one drives the same state, so
//! whichever settles last determines what is displayed.

use std::fmt;
use std::sync::Arc;

use praxis_core::{ActionResult, SafeActionReference, ValidationErrors};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::TransportError;
use crate::state::{ActionErrorPayload, ActionState, ActionStatus};
use crate::transport::Transport;

type OnExecute<I> = Arc<dyn Fn(&I) + Send + Sync>;
type OnSuccess<I, O> = Arc<dyn Fn(&O, &I) + Send + Sync>;
type OnError<I, E> = Arc<dyn Fn(&ActionErrorPayload<E>, &I) + Send + Sync>;
type OnSettled<I, O, E> = Arc<dyn Fn(&ActionResult<O, E>, &I) + Send + Sync>;

struct Callbacks<I, O, E> {
    on_execute: Option<OnExecute<I>>,
    on_success: Option<OnSuccess<I, O>>,
    on_error: Option<OnError<I, E>>,
    on_settled: Option<OnSettled<I, O, E>>,
}

impl<I, O, E> Default for Callbacks<I, O, E> {
    fn default() -> Self {
        Self {
            on_execute: None,
            on_success: None,
            on_error: None,
            on_settled: None,
        }
    }
}

impl<I, O, E> Clone for Callbacks<I, O, E> {
    fn clone(&self) -> Self {
        Self {
            on_execute: self.on_execute.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            on_settled: self.on_settled.clone(),
        }
    }
}

/// Stateful wrapper for calling one action.
///
/// Clones share state, callbacks and transport.
pub struct UseAction<I, O, E = String> {
    reference: SafeActionReference<I, O, E>,
    transport: Arc<dyn Transport>,
    state: Arc<watch::Sender<ActionState<O, E>>>,
    callbacks: Callbacks<I, O, E>,
}

impl<I, O, E> Clone for UseAction<I, O, E> {
    fn clone(&self) -> Self {
        Self {
            reference: self.reference,
            transport: Arc::clone(&self.transport),
            state: Arc::clone(&self.state),
            callbacks: self.callbacks.clone(),
        }
    }
}

/// Creates a [`UseAction`] for `reference` over `transport`.
pub fn use_action<I, O, E>(
    reference: SafeActionReference<I, O, E>,
    transport: Arc<dyn Transport>,
) -> UseAction<I, O, E>
where
    I: Serialize + Send + Sync + 'static,
    O: DeserializeOwned + Clone + Send + Sync + 'static,
    E: DeserializeOwned + From<String> + Clone + Send + Sync + 'static,
{
    UseAction::new(reference, transport)
}

impl<I, O, E> UseAction<I, O, E>
where
    I: Serialize + Send + Sync + 'static,
    O: DeserializeOwned + Clone + Send + Sync + 'static,
    E: DeserializeOwned + From<String> + Clone + Send + Sync + 'static,
{
    /// Creates an idle wrapper.
    pub fn new(reference: SafeActionReference<I, O, E>, transport: Arc<dyn Transport>) -> Self {
        let (state, _) = watch::channel(ActionState::default());
        Self {
            reference,
            transport,
            state: Arc::new(state),
            callbacks: Callbacks::default(),
        }
    }

    /// Called with the input before the request is sent.
    pub fn on_execute(mut self, f: impl Fn(&I) + Send + Sync + 'static) -> Self {
        self.callbacks.on_execute = Some(Arc::new(f));
        self
    }

    /// Called with the data and input when a call succeeds.
    pub fn on_success(mut self, f: impl Fn(&O, &I) + Send + Sync + 'static) -> Self {
        self.callbacks.on_success = Some(Arc::new(f));
        self
    }

    /// Called with the error and input when a call fails.
    pub fn on_error(mut self, f: impl Fn(&ActionErrorPayload<E>, &I) + Send + Sync + 'static) -> Self {
        self.callbacks.on_error = Some(Arc::new(f));
        self
    }

    /// Called with the full result after every call.
    pub fn on_settled(
        mut self,
        f: impl Fn(&ActionResult<O, E>, &I) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.on_settled = Some(Arc::new(f));
        self
    }

    /// Returns the reference this wrapper calls.
    pub fn reference(&self) -> SafeActionReference<I, O, E> {
        self.reference
    }

    /// Starts a call in the background.
    ///
    /// The returned handle may be dropped; the state is updated either way.
    pub fn execute(&self, input: I) -> JoinHandle<ActionResult<O, E>> {
        let this = self.clone();
        tokio::spawn(async move { this.execute_async(input).await })
    }

    /// Calls the action and waits for its result.
    ///
    /// Transport failures and undecodable responses are returned as a
    /// server error carrying the failure message.
    pub async fn execute_async(&self, input: I) -> ActionResult<O, E> {
        self.state.send_modify(|state| {
            state.server_error = None;
            state.validation_errors = None;
            state.status = ActionStatus::Executing;
        });
        if let Some(f) = &self.callbacks.on_execute {
            f(&input);
        }

        let result = match self.send(&input).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    action = self.reference.path(),
                    error = %e,
                    "Action call failed in transport"
                );
                ActionResult::ServerError(E::from(e.to_string()))
            }
        };

        self.settle(&result, &input);
        result
    }

    async fn send(&self, input: &I) -> Result<ActionResult<O, E>, TransportError> {
        let input = serde_json::to_value(input).map_err(TransportError::Encode)?;
        let raw = self
            .transport
            .invoke(self.reference.path(), self.reference.method(), input)
            .await?;
        serde_json::from_value(raw).map_err(TransportError::Decode)
    }

    fn settle(&self, result: &ActionResult<O, E>, input: &I) {
        match result {
            ActionResult::Data(data) => {
                self.state.send_modify(|state| {
                    state.data = Some(data.clone());
                    state.status = ActionStatus::HasSucceeded;
                });
                if let Some(f) = &self.callbacks.on_success {
                    f(data, input);
                }
            }
            ActionResult::ServerError(error) => {
                self.state.send_modify(|state| {
                    state.server_error = Some(error.clone());
                    state.status = ActionStatus::HasErrored;
                });
                if let Some(f) = &self.callbacks.on_error {
                    f(&ActionErrorPayload::ServerError(error.clone()), input);
                }
            }
            ActionResult::ValidationErrors(errors) => {
                self.state.send_modify(|state| {
                    state.validation_errors = Some(errors.clone());
                    state.status = ActionStatus::HasErrored;
                });
                if let Some(f) = &self.callbacks.on_error {
                    f(&ActionErrorPayload::ValidationErrors(errors.clone()), input);
                }
            }
        }

        if let Some(f) = &self.callbacks.on_settled {
            f(result, input);
        }
    }

    /// Returns to `idle` and clears data and errors.
    pub fn reset(&self) {
        self.state.send_modify(|state| *state = ActionState::default());
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> ActionState<O, E> {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ActionState<O, E>> {
        self.state.subscribe()
    }

    /// Returns the current status.
    pub fn status(&self) -> ActionStatus {
        self.state.borrow().status
    }

    /// Returns the last successful data.
    pub fn data(&self) -> Option<O> {
        self.state.borrow().data.clone()
    }

    /// Returns the current server error.
    pub fn server_error(&self) -> Option<E> {
        self.state.borrow().server_error.clone()
    }

    /// Returns the current validation errors.
    pub fn validation_errors(&self) -> Option<ValidationErrors> {
        self.state.borrow().validation_errors.clone()
    }

    /// Whether no call has run since creation or reset.
    pub fn is_idle(&self) -> bool {
        self.status() == ActionStatus::Idle
    }

    /// Whether a call is in flight.
    pub fn is_executing(&self) -> bool {
        self.status() == ActionStatus::Executing
    }

    /// Whether the last settled call succeeded.
    pub fn has_succeeded(&self) -> bool {
        self.status() == ActionStatus::HasSucceeded
    }

    /// Whether the last settled call failed.
    pub fn has_errored(&self) -> bool {
        self.status() == ActionStatus::HasErrored
    }
}

impl<I, O, E> fmt::Debug for UseAction<I, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UseAction")
            .field("path", &self.reference.path())
            .field("method", &self.reference.method())
            .field("status", &self.state.borrow().status)
            .finish_non_exhaustive()
    }
}
