use thiserror::Error;

/// Failures of the URL builder and fetch layer.
///
/// Payloads are plain strings so the error can be cloned into published hook state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Transport-level failure (DNS, connection reset, TLS...)
    #[error("network error: {0}")]
    Network(String),

    /// Response body is not valid JSON
    #[error("invalid JSON response: {0}")]
    Parse(String),

    /// Non-success HTTP status; `message` is TMDB's `status_message` when present
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// List response without a `results` array
    #[error("No movie list")]
    MissingResults,

    /// The URL builder declined to build a URL for this request
    #[error("could not build request URL for {0}")]
    InvalidRequest(String),

    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl SourceError {
    /// Text suitable for a toast, without the variant prefix.
    pub fn detail(&self) -> &str {
        match self {
            SourceError::Network(msg) | SourceError::Parse(msg) => msg,
            SourceError::Status { message, .. } => message,
            SourceError::MissingResults => "No movie list",
            SourceError::InvalidRequest(path) => path,
            SourceError::InvalidBaseUrl { reason, .. } => reason,
        }
    }
}
