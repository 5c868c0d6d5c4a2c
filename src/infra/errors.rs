// src/infra/errors.rs — Error types for the Knowledge Copilot client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopilotError {
    // Backend responses
    #[error("Unauthorized: {}", .detail.as_deref().unwrap_or("missing or invalid token"))]
    Unauthorized { detail: Option<String> },

    #[error("Server error (HTTP {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Server { status: u16, detail: Option<String> },

    #[error("Request rejected (HTTP {status}): {}", .detail.as_deref().unwrap_or("no detail"))]
    Http { status: u16, detail: Option<String> },

    // Transport
    #[error("Could not reach the backend: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from '{endpoint}': {message}")]
    Decode { endpoint: String, message: String },

    // User errors
    #[error("Not logged in. Run `kcopilot login` first.")]
    NotLoggedIn,

    /// Login or registration refused; the message is ready for display.
    #[error("{message}")]
    AuthFailed {
        message: String,
        status: Option<u16>,
    },

    #[error("Unsupported file '{filename}' (accepted: {accepted})")]
    UnsupportedFile { filename: String, accepted: String },

    #[error("Invalid API URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    // Infra
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CopilotError {
    /// Build the right variant for a non-success HTTP status.
    pub fn from_status(status: u16, detail: Option<String>) -> Self {
        match status {
            401 => CopilotError::Unauthorized { detail },
            500..=599 => CopilotError::Server { status, detail },
            _ => CopilotError::Http { status, detail },
        }
    }

    /// HTTP status of the failed response, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CopilotError::Unauthorized { .. } => Some(401),
            CopilotError::Server { status, .. } | CopilotError::Http { status, .. } => {
                Some(*status)
            }
            CopilotError::AuthFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// The server-provided `detail` string, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            CopilotError::Unauthorized { detail }
            | CopilotError::Server { detail, .. }
            | CopilotError::Http { detail, .. } => detail.as_deref(),
            CopilotError::AuthFailed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Text shown to the user: the server detail when present, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

/// Pull a human-readable `detail` out of an error body.
///
/// Handles FastAPI's `{"detail": "..."}` and the validation form
/// `{"detail": [{"msg": "...", ...}]}`.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_classifies() {
        assert!(matches!(
            CopilotError::from_status(401, None),
            CopilotError::Unauthorized { .. }
        ));
        assert!(matches!(
            CopilotError::from_status(503, None),
            CopilotError::Server { status: 503, .. }
        ));
        assert!(matches!(
            CopilotError::from_status(404, None),
            CopilotError::Http { status: 404, .. }
        ));
    }

    #[test]
    fn test_user_message_prefers_detail() {
        let e = CopilotError::from_status(400, Some("Empty file".into()));
        assert_eq!(e.user_message("Unknown error"), "Empty file");
        assert_eq!(e.status(), Some(400));

        let e = CopilotError::NotLoggedIn;
        assert_eq!(e.user_message("Unknown error"), "Unknown error");
        assert_eq!(e.status(), None);
    }

    #[test]
    fn test_extract_detail_string() {
        let body = r#"{"detail": "Incorrect username or password"}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("Incorrect username or password")
        );
    }

    #[test]
    fn test_extract_detail_validation_array() {
        let body = r#"{"detail":[{"loc":["body","question"],"msg":"field required","type":"value_error.missing"}]}"#;
        assert_eq!(extract_detail(body).as_deref(), Some("field required"));
    }

    #[test]
    fn test_extract_detail_missing() {
        assert!(extract_detail("Internal Server Error").is_none());
        assert!(extract_detail(r#"{"error": "x"}"#).is_none());
        assert!(extract_detail(r#"{"detail": ""}"#).is_none());
    }

    #[test]
    fn test_display_includes_detail() {
        let e = CopilotError::from_status(500, Some("Document upload failed: boom".into()));
        assert_eq!(
            e.to_string(),
            "Server error (HTTP 500): Document upload failed: boom"
        );
    }
}
