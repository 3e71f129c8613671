//! Typed action references and HTTP method binding.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Route prefix under which every action endpoint is mounted.
pub const DEFAULT_ROUTE_PREFIX: &str = "/api/_actions";

/// HTTP method an action endpoint is bound to.
///
/// Derived from an optional filename suffix (`get-user.get.rs`); defaults to
/// [`HttpMethod::Post`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`; input travels in the `input` query parameter.
    Get,
    /// `POST`; the default.
    #[default]
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Every supported method.
    pub const ALL: [Self; 5] = [Self::Get, Self::Post, Self::Put, Self::Patch, Self::Delete];

    /// Returns the upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns the lower-case filename suffix for this method.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// Recognizes a filename suffix, ignoring ASCII case.
    #[must_use]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.suffix().eq_ignore_ascii_case(suffix))
    }

    /// Returns `true` if input is carried in the request body.
    #[must_use]
    pub const fn carries_body(self) -> bool {
        !matches!(self, Self::Get)
    }

    /// Converts to an [`http::Method`].
    #[must_use]
    pub fn to_http(self) -> http::Method {
        match self {
            Self::Get => http::Method::GET,
            Self::Post => http::Method::POST,
            Self::Put => http::Method::PUT,
            Self::Patch => http::Method::PATCH,
            Self::Delete => http::Method::DELETE,
        }
    }

    /// Converts from an [`http::Method`], if supported.
    #[must_use]
    pub fn from_http(method: &http::Method) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == method.as_str())
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_suffix(s).ok_or_else(|| format!("unsupported HTTP method: {s}"))
    }
}

/// Projects the input, output and server error types of an action.
///
/// Implemented by executable actions and by references, so a reference type
/// can be derived from an action's signature.
pub trait ActionTypes {
    /// Validated input type received by the handler.
    type Input;
    /// Output type returned by the handler.
    type Output;
    /// Server error type surfaced to callers.
    type ServerError;
}

/// Logic-free, typed client stub for one action endpoint.
///
/// Holds only the action's route name (its path below the route prefix) and
/// HTTP method. The type parameters carry the action's input, output and
/// server error types so callers stay typed.
///
/// ```
/// use praxis_core::{HttpMethod, SafeActionReference};
///
/// const GET_USER: SafeActionReference<u64, String> =
///     SafeActionReference::new("get-user", HttpMethod::Get);
///
/// assert_eq!(GET_USER.path(), "get-user");
/// assert_eq!(GET_USER.method(), HttpMethod::Get);
/// ```
pub struct SafeActionReference<I, O, E = String> {
    path: &'static str,
    method: HttpMethod,
    _types: PhantomData<fn(I) -> (O, E)>,
}

/// The reference type matching an action's signature.
pub type ReferenceOf<A> = SafeActionReference<
    <A as ActionTypes>::Input,
    <A as ActionTypes>::Output,
    <A as ActionTypes>::ServerError,
>;

impl<I, O, E> SafeActionReference<I, O, E> {
    /// Creates a reference to the action routed as `path`.
    #[must_use]
    pub const fn new(path: &'static str, method: HttpMethod) -> Self {
        Self {
            path,
            method,
            _types: PhantomData,
        }
    }

    /// Returns the route name, relative to the route prefix.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the endpoint's HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }
}

impl<I, O, E> ActionTypes for SafeActionReference<I, O, E> {
    type Input = I;
    type Output = O;
    type ServerError = E;
}

impl<I, O, E> Clone for SafeActionReference<I, O, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I, O, E> Copy for SafeActionReference<I, O, E> {}

impl<I, O, E> PartialEq for SafeActionReference<I, O, E> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path && self.method == other.method
    }
}

impl<I, O, E> Eq for SafeActionReference<I, O, E> {}

impl<I, O, E> fmt::Debug for SafeActionReference<I, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeActionReference")
            .field("path", &self.path)
            .field("method", &self.method)
            .finish()
    }
}
