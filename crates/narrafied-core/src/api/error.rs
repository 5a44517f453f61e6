use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured failure payload decoded from a non-success response.
///
/// The backend reports errors as `{"error": "...", "details": "..."}`.
/// `message` holds the `error` field exactly as the server sent it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct RequestError {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{error}")]
    Request {
        status: StatusCode,
        error: RequestError,
    },

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Build an error from a non-success response body.
    ///
    /// Bodies in the `{error, details?}` shape are kept verbatim; anything
    /// else is reported as an invalid response.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match serde_json::from_str::<RequestError>(body) {
            Ok(error) => ApiError::Request { status, error },
            Err(_) => ApiError::InvalidResponse(format!(
                "Status {}: {}",
                status,
                Self::truncate_body(body)
            )),
        }
    }

    /// The server-reported error, if this failure carries one
    pub fn request_error(&self) -> Option<&RequestError> {
        match self {
            ApiError::Request { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    /// True when the server rejected the bearer credential.
    /// An expired token is only ever discovered this way.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Message suitable for a user-facing notice.
    ///
    /// Server messages are returned verbatim. `fallback` is used when the
    /// server sent an empty message or the failure has no server message.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Request { error, .. } if !error.message.is_empty() => error.message.clone(),
            ApiError::NotAuthenticated => "Please sign in to continue.".to_string(),
            _ => fallback.to_string(),
        }
    }
}
