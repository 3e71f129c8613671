//! Transport errors.

/// Failure to obtain an action result from the server.
///
/// Never surfaced directly to callers of [`UseAction`](crate::UseAction):
/// its message becomes a synthesized server error.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The request could not be sent or the response not received.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// The request could not be built.
    #[error("invalid request: {0}")]
    Request(#[from] http::Error),

    /// The input could not be serialized.
    #[error("failed to encode action input: {0}")]
    Encode(#[source] serde_json::Error),

    /// The response body is not a valid action result.
    #[error("invalid action response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl TransportError {
    /// Returns the HTTP status code, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
