//! Failure modes of a completion call

use serde::Deserialize;

/// Result type for completion calls
pub type Result<T> = std::result::Result<T, CompletionError>;

/// Why a completion call failed.
///
/// Every variant renders to a human-readable string that the relay shows to
/// the user unchanged; the variant itself is only used for logging and the
/// retry decision.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// Connection refused, DNS failure, timeout, truncated body
    #[error("network error: {0}")]
    Network(String),

    /// Missing or rejected API key (HTTP 401/403)
    #[error("authentication failed: {0}")]
    Auth(String),

    /// HTTP 429
    #[error("rate limited: {message}")]
    RateLimited {
        message: String,
        /// Seconds from the `Retry-After` header, when numeric
        retry_after: Option<u64>,
    },

    /// The service answered 2xx but the body was not a usable completion
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Any other non-success status
    #[error("{0}")]
    Unknown(String),
}

impl CompletionError {
    /// Map a non-success HTTP response onto an error variant.
    pub fn from_status(status: reqwest::StatusCode, body: &str, retry_after: Option<u64>) -> Self {
        let detail = extract_error_message(body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                body.trim().to_string()
            }
        });

        match status.as_u16() {
            401 | 403 => CompletionError::Auth(detail),
            429 => CompletionError::RateLimited {
                message: detail,
                retry_after,
            },
            code => CompletionError::Unknown(format!("HTTP {}: {}", code, detail)),
        }
    }

    /// Whether repeating the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CompletionError::Network(_) | CompletionError::RateLimited { .. }
        )
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            CompletionError::RateLimited { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Short tag for log lines
    pub fn kind(&self) -> &'static str {
        match self {
            CompletionError::Network(_) => "network",
            CompletionError::Auth(_) => "auth",
            CompletionError::RateLimited { .. } => "rate_limited",
            CompletionError::MalformedResponse(_) => "malformed_response",
            CompletionError::Unknown(_) => "unknown",
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CompletionError::MalformedResponse(err.to_string())
        } else {
            CompletionError::Network(err.to_string())
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull `error.message` out of an OpenAI-style error body
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
}
