//! Errors surfaced by the client runtime.

use bytes::Bytes;
use http::StatusCode;

/// Failure of a call made through the interceptor.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    /// The backend answered with a non-success status.
    #[error("Request failed with status {status}")]
    Status {
        /// Final status of the call.
        status: StatusCode,
        /// Raw response body.
        body: Bytes,
    },

    /// The call never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request could not be built.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl HttpError {
    /// Status code, when the backend answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the call ended in a 401.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HttpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
