// src/client/types.rs — Wire shapes of the Knowledge Copilot REST API

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An indexed document as listed by `GET /api/documents`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: String,
    pub filename: String,
    pub upload_date: String,
    /// Content type recorded at upload; the backend may store null.
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub processed: bool,
}

impl DocumentInfo {
    /// Date portion of `upload_date` (YYYY-MM-DD), or the raw value if it
    /// doesn't parse.
    pub fn upload_day(&self) -> String {
        let raw = self.upload_date.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return dt.date_naive().to_string();
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
                return dt.date().to_string();
            }
        }
        raw.to_string()
    }

    pub fn file_type_label(&self) -> &str {
        self.file_type.as_deref().unwrap_or("unknown")
    }
}

/// A document cited by an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_preview: Option<String>,
}

impl SourceRef {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_preview: None,
        }
    }
}

/// Body of `POST /api/query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<QueryContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryContext {
    pub conversation_id: String,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>, conversation_id: Option<String>) -> Self {
        Self {
            question: question.into(),
            context: conversation_id.map(|conversation_id| QueryContext { conversation_id }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub chunks_processed: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// The signed-in user as returned by `GET /profile`. Unknown fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        if self.username.is_empty() {
            "(unnamed)"
        } else {
            &self.username
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub message: String,
}
