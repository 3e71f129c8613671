//! Action transports.
//!
//! A [`Transport`] delivers raw JSON input to an action endpoint and returns
//! the raw JSON result. [`HttpTransport`] talks to a remote server;
//! [`LocalTransport`] dispatches into an in-process [`ActionRouter`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use praxis_core::{HttpMethod, DEFAULT_ROUTE_PREFIX};
use praxis_server::{ActionRouter, INPUT_QUERY_KEY};
use serde_json::Value;

use crate::error::TransportError;

/// A boxed future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Delivers action input to an endpoint.
pub trait Transport: Send + Sync + 'static {
    /// Invokes the action mounted at `path` and returns the raw result.
    fn invoke<'a>(
        &'a self,
        path: &'a str,
        method: HttpMethod,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, TransportError>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn invoke<'a>(
        &'a self,
        path: &'a str,
        method: HttpMethod,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, TransportError>> {
        (**self).invoke(path, method, input)
    }
}

/// Encodes `input` as the `input` query parameter. `null` is omitted.
fn query_string(input: &Value) -> Option<String> {
    if input.is_null() {
        return None;
    }
    serde_urlencoded::to_string([(INPUT_QUERY_KEY, input.to_string())]).ok()
}

/// HTTP transport backed by `reqwest`.
///
/// GET actions receive their input as `?input=<json>`; every other method
/// sends it as a JSON body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    prefix: String,
}

impl HttpTransport {
    /// Creates a transport for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a transport that reuses an existing client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            prefix: DEFAULT_ROUTE_PREFIX.to_string(),
        }
    }

    /// Sets the route prefix actions are mounted under. `"/"` mounts at the
    /// root.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_matches('/');
        self.prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    /// Returns the full URL of an action.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}/{}", self.base_url, self.prefix, path.trim_start_matches('/'))
    }

    async fn send(&self, path: &str, method: HttpMethod, input: Value) -> Result<Value, TransportError> {
        let url = self.url_for(path);
        let request = if method.carries_body() {
            self.client.request(method.to_http(), &url).json(&input)
        } else {
            let url = match query_string(&input) {
                Some(query) => format!("{url}?{query}"),
                None => url,
            };
            self.client.request(method.to_http(), url)
        };

        tracing::debug!(method = %method, path, "Invoking remote action");
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        serde_json::from_slice(&body).map_err(TransportError::Decode)
    }
}

impl Transport for HttpTransport {
    fn invoke<'a>(
        &'a self,
        path: &'a str,
        method: HttpMethod,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, TransportError>> {
        Box::pin(self.send(path, method, input))
    }
}

/// In-process transport over an [`ActionRouter`].
///
/// Requests go through the same dispatch path as HTTP requests, including
/// input extraction and response encoding.
#[derive(Debug, Clone)]
pub struct LocalTransport {
    router: Arc<ActionRouter>,
}

impl LocalTransport {
    /// Creates a transport dispatching into `router`.
    pub fn new(router: ActionRouter) -> Self {
        Self {
            router: Arc::new(router),
        }
    }

    /// Returns the underlying router.
    pub fn router(&self) -> &ActionRouter {
        &self.router
    }

    async fn send(&self, path: &str, method: HttpMethod, input: Value) -> Result<Value, TransportError> {
        let mut uri = self.router.path_for(path);
        let body = if method.carries_body() {
            Bytes::from(serde_json::to_vec(&input).map_err(TransportError::Encode)?)
        } else {
            if let Some(query) = query_string(&input) {
                uri = format!("{uri}?{query}");
            }
            Bytes::new()
        };

        let request = http::Request::builder()
            .method(method.to_http())
            .uri(uri)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)?;

        let response = self.router.dispatch(request).await;
        let status = response.status();
        let body = match response.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(never) => match never {},
        };

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        serde_json::from_slice(&body).map_err(TransportError::Decode)
    }
}

impl Transport for LocalTransport {
    fn invoke<'a>(
        &'a self,
        path: &'a str,
        method: HttpMethod,
        input: Value,
    ) -> BoxFuture<'a, Result<Value, TransportError>> {
        Box::pin(self.send(path, method, input))
    }
}
