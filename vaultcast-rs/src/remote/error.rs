//! Classification of forum responses into a small error taxonomy.

use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the forum, or by the transport on the way to it.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("Not found (HTTP {status}): {message}")]
    NotFound { status: u16, message: String },

    #[error("Unprocessable: {message}")]
    Unprocessable { message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unknown error (HTTP {status}): {message}")]
    Unknown { status: u16, message: String },

    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::UnexpectedPayload(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}

/// Error body Discourse sends alongside failing responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub error_type: Option<String>,
}

impl ErrorPayload {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Joined error messages, if the payload carried any.
    pub fn message(&self) -> Option<String> {
        if self.errors.is_empty() {
            None
        } else {
            Some(self.errors.join(", "))
        }
    }
}

/// Returns `true` for statuses the client treats as success.
pub fn is_success(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Classify a non-success response.
pub fn classify(status: u16, body: &str) -> RemoteError {
    let payload = ErrorPayload::parse(body);
    let message = payload.message().unwrap_or_else(|| fallback_message(status, body));

    if payload.error_type.as_deref() == Some("invalid_access") {
        return RemoteError::Unauthenticated { message };
    }

    match status {
        403 => RemoteError::Unauthenticated { message },
        404 | 410 => RemoteError::NotFound { status, message },
        422 => RemoteError::Unprocessable { message },
        429 => RemoteError::RateLimited { message },
        500..=599 => RemoteError::ServerError { status, message },
        _ => RemoteError::Unknown { status, message },
    }
}

fn fallback_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() || body.starts_with('<') {
        format!("HTTP {}", status)
    } else {
        body.chars().take(200).collect()
    }
}
