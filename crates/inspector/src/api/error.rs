//! Errors surfaced by the REST client

/// Failure talking to the capture server
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused, timeout, ...)
    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    /// The server answered with a non-success status
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded
    #[error("invalid response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl ApiError {
    /// Text to show to the operator, preferring the server's own wording
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, status } if message.trim().is_empty() => {
                format!("Server returned status {}", status)
            }
            ApiError::Status { message, .. } => message.trim().to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
