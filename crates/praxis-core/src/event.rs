//! Request event types.
//!
//! The [`ActionEvent`] is an opaque, read-only view of the transport request
//! that triggered an action. It is shared by reference through the middleware
//! chain and into the handler; nothing in praxis mutates it.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use http::{HeaderMap, Method, Uri};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for each action invocation, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it usable for log correlation.
///
/// ```
/// use praxis_core::RequestId;
///
/// let a = RequestId::new();
/// let b = RequestId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[derive(Debug)]
struct EventInner {
    request_id: RequestId,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    received_at: Instant,
}

/// Read-only handle to the request that triggered an action.
///
/// Cloning is cheap; all clones refer to the same request.
///
/// ```
/// use praxis_core::ActionEvent;
///
/// let event = ActionEvent::new(
///     http::Method::GET,
///     "/api/_actions/get-user?input=%7B%7D".parse().unwrap(),
///     http::HeaderMap::new(),
/// );
/// assert_eq!(event.path(), "/api/_actions/get-user");
/// ```
#[derive(Clone)]
pub struct ActionEvent {
    inner: Arc<EventInner>,
}

impl ActionEvent {
    /// Creates an event from request parts.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            inner: Arc::new(EventInner {
                request_id: RequestId::new(),
                method,
                uri,
                headers,
                received_at: Instant::now(),
            }),
        }
    }

    /// Creates an event from the head of an `http` request.
    #[must_use]
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self::new(parts.method.clone(), parts.uri.clone(), parts.headers.clone())
    }

    /// Creates an event for an in-process invocation with no transport request.
    #[must_use]
    pub fn detached() -> Self {
        Self::new(Method::POST, Uri::from_static("/"), HeaderMap::new())
    }

    /// Returns the invocation's request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.inner.request_id
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.inner.method
    }

    /// Returns the full request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.inner.uri
    }

    /// Returns the request path without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.inner.uri.path()
    }

    /// Returns all request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.inner.headers
    }

    /// Returns a header value if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns when the event was received.
    #[must_use]
    pub fn received_at(&self) -> Instant {
        self.inner.received_at
    }
}

impl Default for ActionEvent {
    fn default() -> Self {
        Self::detached()
    }
}

impl fmt::Debug for ActionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionEvent")
            .field("request_id", &self.inner.request_id)
            .field("method", &self.inner.method)
            .field("uri", &self.inner.uri)
            .finish_non_exhaustive()
    }
}
