//! Action routing.
//!
//! Actions are mounted at `<prefix>/<name>`, where the prefix defaults to
//! [`DEFAULT_ROUTE_PREFIX`]. Each path holds at most one handler per
//! [`HttpMethod`].

use std::collections::BTreeMap;

use bytes::Bytes;
use http::header::{HeaderValue, ALLOW};
use http::StatusCode;
use praxis_core::{HttpMethod, DEFAULT_ROUTE_PREFIX};
use tracing::Instrument;

use crate::handler::ActionHandler;
use crate::response::{Response, ResponseExt, ACTION_NOT_FOUND, METHOD_NOT_ALLOWED};

/// Maps HTTP methods to handlers for a single action path.
#[derive(Debug, Clone, Default)]
pub struct MethodRoutes {
    get: Option<ActionHandler>,
    post: Option<ActionHandler>,
    put: Option<ActionHandler>,
    patch: Option<ActionHandler>,
    delete: Option<ActionHandler>,
}

impl MethodRoutes {
    /// Creates an empty set of method routes.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, method: HttpMethod) -> &mut Option<ActionHandler> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Delete => &mut self.delete,
        }
    }

    /// Registers a handler for `method`, returning the one it replaced.
    pub fn insert(&mut self, method: HttpMethod, handler: ActionHandler) -> Option<ActionHandler> {
        self.slot(method).replace(handler)
    }

    /// Returns the handler registered for `method`.
    pub fn get_handler(&self, method: HttpMethod) -> Option<&ActionHandler> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }

    /// Returns the methods that have a handler, in a stable order.
    pub fn allowed_methods(&self) -> Vec<HttpMethod> {
        HttpMethod::ALL
            .into_iter()
            .filter(|method| self.get_handler(*method).is_some())
            .collect()
    }

    fn allow_header(&self) -> String {
        self.allowed_methods()
            .iter()
            .map(|method| method.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Dispatches requests to mounted action handlers.
///
/// ```
/// use praxis_action::{create_safe_action_client, HandlerArgs};
/// use praxis_core::HttpMethod;
/// use praxis_middleware::EmptyContext;
/// use praxis_server::{body_handler, ActionRouter};
/// use serde_json::Value;
///
/// let ping = create_safe_action_client()
///     .action(|_args: HandlerArgs<EmptyContext, Value>| async move { Ok("pong") });
///
/// let router = ActionRouter::new().route("ping", HttpMethod::Post, body_handler(ping));
/// assert!(router.contains("ping"));
/// assert_eq!(router.path_for("ping"), "/api/_actions/ping");
/// ```
#[derive(Debug, Clone)]
pub struct ActionRouter {
    prefix: String,
    routes: BTreeMap<String, MethodRoutes>,
}

impl Default for ActionRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRouter {
    /// Creates a router under the default prefix.
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_ROUTE_PREFIX)
    }

    /// Creates a router under a custom prefix.
    ///
    /// Surrounding slashes are ignored, so `"rpc/"` mounts under `/rpc` and
    /// `"/"` mounts actions directly at the root.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_matches('/');
        // Stored without a trailing slash; the root prefix is empty.
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        };
        Self {
            prefix,
            routes: BTreeMap::new(),
        }
    }

    /// Returns the route prefix.
    pub fn prefix(&self) -> &str {
        if self.prefix.is_empty() {
            "/"
        } else {
            &self.prefix
        }
    }

    /// Mounts `handler` for `name` and `method`.
    pub fn route(mut self, name: &str, method: HttpMethod, handler: ActionHandler) -> Self {
        self.add(name, method, handler);
        self
    }

    /// Mounts `handler` in place. A handler already mounted for the same
    /// name and method is replaced.
    pub fn add(&mut self, name: &str, method: HttpMethod, handler: ActionHandler) {
        let name = name.trim_matches('/');
        let replaced = self
            .routes
            .entry(name.to_string())
            .or_default()
            .insert(method, handler);
        if replaced.is_some() {
            tracing::warn!(action = name, method = %method, "Replaced an already mounted action");
        }
    }

    /// Mounts every route of `other` under this router's prefix.
    pub fn merge(mut self, other: ActionRouter) -> Self {
        for (name, routes) in other.routes {
            for method in HttpMethod::ALL {
                if let Some(handler) = routes.get_handler(method) {
                    self.add(&name, method, handler.clone());
                }
            }
        }
        self
    }

    /// Returns whether an action is mounted under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.routes.contains_key(name.trim_matches('/'))
    }

    /// Returns the mounted action names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Returns the method routes for `name`.
    pub fn routes_for(&self, name: &str) -> Option<&MethodRoutes> {
        self.routes.get(name.trim_matches('/'))
    }

    /// Returns the full request path of an action.
    pub fn path_for(&self, name: &str) -> String {
        format!("{}/{}", self.prefix, name.trim_matches('/'))
    }

    fn action_name<'p>(&self, path: &'p str) -> Option<&'p str> {
        path.strip_prefix(self.prefix.as_str())?
            .strip_prefix('/')
            .map(|name| name.trim_end_matches('/'))
            .filter(|name| !name.is_empty())
    }

    /// Handles one request.
    ///
    /// Responds with 200 and the serialized `ActionResult`, 404 when no
    /// action is mounted at the path, or 405 with an `Allow` header when the
    /// action exists under other methods.
    pub async fn dispatch(&self, request: http::Request<Bytes>) -> Response {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path().to_string();

        let Some(routes) = self.action_name(&path).and_then(|name| self.routes.get(name)) else {
            tracing::debug!(path = %path, "No action mounted at path");
            return Response::json_error(
                StatusCode::NOT_FOUND,
                ACTION_NOT_FOUND,
                &format!("No action found at {path}"),
            );
        };

        let handler = HttpMethod::from_http(&parts.method).and_then(|m| routes.get_handler(m));
        let Some(handler) = handler else {
            let mut response = Response::json_error(
                StatusCode::METHOD_NOT_ALLOWED,
                METHOD_NOT_ALLOWED,
                &format!("Method {} not allowed for {path}", parts.method),
            );
            if let Ok(allow) = HeaderValue::from_str(&routes.allow_header()) {
                response.headers_mut().insert(ALLOW, allow);
            }
            return response;
        };

        let span = tracing::debug_span!("dispatch", method = %parts.method, path = %path);
        let result = handler.handle(&parts, &body).instrument(span).await;

        match serde_json::to_vec(&result) {
            Ok(bytes) => Response::json_bytes(StatusCode::OK, bytes),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode response body");
                Response::json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Failed to encode response body",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{body_handler, query_handler};
    use http_body_util::BodyExt;
    use praxis_action::{create_safe_action_client, HandlerArgs};
    use praxis_middleware::EmptyContext;
    use serde_json::{json, Value};

    fn echo_handler() -> ActionHandler {
        body_handler(
            create_safe_action_client()
                .action(|args: HandlerArgs<EmptyContext, Value>| async move { Ok(args.parsed_input) }),
        )
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_prefix_normalization() {
        assert_eq!(ActionRouter::with_prefix("rpc/").prefix(), "/rpc");
        assert_eq!(ActionRouter::new().prefix(), "/api/_actions");
        assert_eq!(ActionRouter::with_prefix("/").prefix(), "/");
        assert_eq!(ActionRouter::with_prefix("").prefix(), "/");
    }

    #[tokio::test]
    async fn test_root_prefix_dispatch() {
        let router = ActionRouter::with_prefix("/").route("ping", HttpMethod::Post, echo_handler());
        assert_eq!(router.path_for("ping"), "/ping");
        assert_eq!(router.action_name("/auth/login"), Some("auth/login"));
        assert_eq!(router.action_name("/"), None);

        let request = http::Request::post("/ping")
            .body(Bytes::from_static(b"1"))
            .unwrap();
        let response = router.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "data": 1 }));
    }

    #[test]
    fn test_allowed_methods_order() {
        let mut routes = MethodRoutes::new();
        routes.insert(HttpMethod::Delete, echo_handler());
        routes.insert(HttpMethod::Get, echo_handler());
        assert_eq!(
            routes.allowed_methods(),
            vec![HttpMethod::Get, HttpMethod::Delete]
        );
        assert_eq!(routes.allow_header(), "GET, DELETE");
    }

    #[test]
    fn test_action_name_requires_prefix() {
        let router = ActionRouter::new();
        assert_eq!(router.action_name("/api/_actions/auth/login"), Some("auth/login"));
        assert_eq!(router.action_name("/api/_actions/"), None);
        assert_eq!(router.action_name("/api/_actionsx/a"), None);
        assert_eq!(router.action_name("/other/a"), None);
    }

    #[tokio::test]
    async fn test_dispatch_nested_name() {
        let router = ActionRouter::new().route("auth/login", HttpMethod::Post, echo_handler());
        let request = http::Request::post("/api/_actions/auth/login")
            .body(Bytes::from_static(br#"{"user":"a"}"#))
            .unwrap();

        let response = router.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "data": { "user": "a" } }));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_action() {
        let router = ActionRouter::new();
        let request = http::Request::post("/api/_actions/missing")
            .body(Bytes::new())
            .unwrap();

        let response = router.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], ACTION_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_wrong_method() {
        let router = ActionRouter::new().route(
            "get-user",
            HttpMethod::Get,
            query_handler(
                create_safe_action_client()
                    .action(|_args: HandlerArgs<EmptyContext, Value>| async move { Ok(1) }),
            ),
        );
        let request = http::Request::post("/api/_actions/get-user")
            .body(Bytes::new())
            .unwrap();

        let response = router.dispatch(request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(ALLOW).unwrap(), "GET");
    }

    #[test]
    fn test_merge_keeps_prefix() {
        let a = ActionRouter::with_prefix("/rpc").route("a", HttpMethod::Post, echo_handler());
        let b = ActionRouter::new().route("b", HttpMethod::Put, echo_handler());
        let merged = a.merge(b);

        assert_eq!(merged.prefix(), "/rpc");
        assert_eq!(merged.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(merged
            .routes_for("b")
            .unwrap()
            .get_handler(HttpMethod::Put)
            .is_some());
    }
}
