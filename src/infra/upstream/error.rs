use thiserror::Error;

/// Failure of an outbound fetch. Never cached; the memoizer propagates these
/// unchanged and route handlers turn them into the JSON error envelope.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("upstream request timed out")]
    Timeout,
    #[error("upstream entity not found: {message}")]
    NotFound { message: String },
    #[error("network error talking to upstream: {0}")]
    Network(String),
    #[error("failed to decode upstream payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}
