//! Error types for calls against the analytics API.
use thiserror::Error;

/// Longest service message carried inside an error.
const MAX_MESSAGE_LEN: usize = 300;

/// Failure of a single remote call. Every variant is reported to the caller;
/// none of them is retried here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// No credential configured, or the service rejected it (HTTP 401)
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    /// Credential accepted but access denied (HTTP 403)
    #[error("access denied: {0}")]
    Forbidden(String),

    /// The service rejected the query (400, 422 and other 4xx)
    #[error("query rejected: {0}")]
    MalformedRequest(String),

    /// Server-side failure, missing endpoint, rate limit, or an unusable
    /// response body
    #[error("analytics service error: {0}")]
    RemoteFault(String),

    /// Network, connect or timeout failure
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

impl QueryError {
    /// Classify a non-success HTTP status.
    ///
    /// Only statuses that describe the query itself count as
    /// `MalformedRequest`; 404 (wrong base URL) and 429 (rate limited) are
    /// the service's side, 408 is a timeout.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => QueryError::Unauthenticated(message),
            403 => QueryError::Forbidden(message),
            408 => QueryError::TransportFailure(message),
            404 | 429 => QueryError::RemoteFault(message),
            400..=499 => QueryError::MalformedRequest(message),
            _ => QueryError::RemoteFault(message),
        }
    }

    /// The message carried by any variant.
    pub fn message(&self) -> &str {
        match self {
            QueryError::Unauthenticated(m)
            | QueryError::Forbidden(m)
            | QueryError::MalformedRequest(m)
            | QueryError::RemoteFault(m)
            | QueryError::TransportFailure(m) => m,
        }
    }

    /// True for failures that a new credential could fix.
    pub fn is_auth(&self) -> bool {
        matches!(self, QueryError::Unauthenticated(_) | QueryError::Forbidden(_))
    }
}

/// Pull a readable message out of an error response body.
///
/// The service answers errors with `{"error": "..."}`; anything else is
/// passed through as trimmed text.
pub fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("error") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => None,
        });
    let message = from_json.unwrap_or_else(|| body.trim().to_string());
    if message.is_empty() {
        return "no message".to_string();
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        let truncated: String = message.chars().take(MAX_MESSAGE_LEN).collect();
        return format!("{}...", truncated);
    }
    message
}
