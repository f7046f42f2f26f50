use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session may have expired")]
    Unauthorized { message: Option<String> },

    #[error("Access denied: {body}")]
    AccessDenied { message: Option<String>, body: String },

    #[error("Resource not found: {body}")]
    NotFound { message: Option<String>, body: String },

    #[error("Server error ({status}): {body}")]
    ServerError {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("Request rejected ({status}): {body}")]
    Rejected {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

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

    /// Pull the `message` field out of a JSON error body, if there is one.
    fn extract_message(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let message = Self::extract_message(body);
        let body = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized { message },
            403 => ApiError::AccessDenied { message, body },
            404 => ApiError::NotFound { message, body },
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                message,
                body,
            },
            code => ApiError::Rejected {
                status: code,
                message,
                body,
            },
        }
    }

    /// Classify a transport failure, keeping timeouts distinct.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::NetworkError(err)
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::AccessDenied { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::ServerError { status, .. } | ApiError::Rejected { status, .. } => {
                Some(*status)
            }
            ApiError::NetworkError(e) => e.status().map(|s| s.as_u16()),
            ApiError::Timeout | ApiError::InvalidRequest(_) | ApiError::InvalidResponse(_) => None,
        }
    }

    /// Message supplied by the server in the error body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::AccessDenied { message, .. }
            | ApiError::NotFound { message, .. }
            | ApiError::ServerError { message, .. }
            | ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the server's message when it sent one, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            ApiError::Timeout => true,
            ApiError::NetworkError(e) => e.is_timeout(),
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// User-facing text for any error coming out of an API call.
///
/// Looks through `anyhow` context for an `ApiError` and prefers its server
/// message; otherwise uses `fallback`.
pub fn user_message(err: &anyhow::Error, fallback: &str) -> String {
    err.downcast_ref::<ApiError>()
        .map(|e| e.user_message(fallback))
        .unwrap_or_else(|| fallback.to_string())
}
