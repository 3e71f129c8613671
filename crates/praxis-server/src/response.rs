//! Response construction helpers.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;

/// HTTP response type produced by the router.
pub type Response = http::Response<Full<Bytes>>;

/// Error code for a path with no registered action.
pub const ACTION_NOT_FOUND: &str = "ACTION_NOT_FOUND";

/// Error code for a known action requested with the wrong method.
pub const METHOD_NOT_ALLOWED: &str = "METHOD_NOT_ALLOWED";

/// Extension trait for building JSON responses.
pub trait ResponseExt {
    /// Creates a JSON response from already serialized bytes.
    fn json_bytes(status: StatusCode, body: Vec<u8>) -> Response;

    /// Creates a JSON error envelope `{"error":{"code","message"}}`.
    fn json_error(status: StatusCode, code: &str, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn json_bytes(status: StatusCode, body: Vec<u8>) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::from(body)));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }

    fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        Self::json_bytes(status, body.to_string().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_json_error_envelope() {
        let response = Response::json_error(StatusCode::NOT_FOUND, ACTION_NOT_FOUND, "nope");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], ACTION_NOT_FOUND);
        assert_eq!(json["error"]["message"], "nope");
    }
}
