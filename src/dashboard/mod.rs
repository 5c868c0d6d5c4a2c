// src/dashboard/mod.rs — Chat and document controller shared by both views
//
// Every user action is one backend request. Outcomes are recorded as
// transcript entries or notices; nothing here retries or queues.

pub mod notice;
pub mod transcript;

use std::sync::Arc;

use crate::client::{Auth, DocumentInfo, KnowledgeBackend, QueryRequest, QueryResponse};
use crate::files::UploadFile;
use crate::infra::errors::CopilotError;
pub use notice::{Notice, NoticeLevel, NOTICE_TTL};
pub use transcript::{ChatMessage, Role, Transcript};

pub const MSG_FETCH_FAILED: &str = "Failed to fetch documents";
pub const MSG_UPLOADED: &str = "Document uploaded successfully!";
pub const MSG_QUERY_FAILED: &str = "Failed to get response";
pub const MSG_DELETED: &str = "Document deleted successfully!";
pub const MSG_ERROR_REPLY: &str = "Sorry, I encountered an error processing your request.";
const UNKNOWN_ERROR: &str = "Unknown error";

pub struct Dashboard {
    backend: Arc<dyn KnowledgeBackend>,
    auth: Auth,
    transcript: Transcript,
    documents: Vec<DocumentInfo>,
    notices: Vec<Notice>,
    conversation_id: Option<String>,
    sidebar_open: bool,
    uploading: bool,
    loading: bool,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn KnowledgeBackend>, auth: Auth) -> Self {
        Self {
            backend,
            auth,
            transcript: Transcript::new(),
            documents: Vec::new(),
            notices: Vec::new(),
            conversation_id: None,
            sidebar_open: true,
            uploading: false,
            loading: false,
        }
    }

    pub fn with_sidebar(mut self, open: bool) -> Self {
        self.sidebar_open = open;
        self
    }

    /// Replace the credentials used for subsequent requests.
    pub fn set_auth(&mut self, auth: Auth) {
        self.auth = auth;
    }

    // ─── Documents ──────────────────────────────────────────────

    /// Reload the document list. On failure the previous snapshot is kept.
    pub async fn refresh_documents(&mut self) -> bool {
        match self.backend.list_documents(&self.auth).await {
            Ok(docs) => {
                tracing::debug!(count = docs.len(), "documents refreshed");
                self.documents = docs;
                true
            }
            Err(e) => {
                tracing::warn!("document list failed: {}", e);
                self.notify(Notice::error(MSG_FETCH_FAILED));
                false
            }
        }
    }

    pub async fn upload(&mut self, file: UploadFile) -> bool {
        self.uploading = true;
        let filename = file.filename.clone();
        let result = self.backend.upload_document(&self.auth, file).await;
        self.uploading = false;

        match result {
            Ok(resp) => {
                tracing::info!(
                    filename = %filename,
                    chunks = ?resp.chunks_processed,
                    "document uploaded"
                );
                self.refresh_documents().await;
                self.notify(Notice::success(MSG_UPLOADED));
                true
            }
            Err(e) => {
                tracing::warn!(filename = %filename, "upload failed: {}", e);
                self.notify(Notice::error(format!(
                    "Upload failed: {}",
                    e.user_message(UNKNOWN_ERROR)
                )));
                false
            }
        }
    }

    pub async fn delete(&mut self, document_id: &str) -> bool {
        match self.backend.delete_document(&self.auth, document_id).await {
            Ok(()) => {
                self.refresh_documents().await;
                self.notify(Notice::success(MSG_DELETED));
                true
            }
            Err(e) => {
                tracing::warn!(document_id, "delete failed: {}", e);
                self.notify(Notice::error(format!(
                    "Delete failed: {}",
                    e.user_message(UNKNOWN_ERROR)
                )));
                false
            }
        }
    }

    // ─── Chat ───────────────────────────────────────────────────

    /// First half of a send: record the user's message and build the
    /// request. `None` for blank input, in which case nothing is recorded.
    pub fn begin_query(&mut self, input: &str) -> Option<QueryRequest> {
        let question = input.trim();
        if question.is_empty() {
            return None;
        }
        self.transcript.push(ChatMessage::user(question));
        self.loading = true;
        Some(QueryRequest::new(question, self.conversation_id.clone()))
    }

    /// Second half of a send: record exactly one assistant message.
    pub fn finish_query(&mut self, result: Result<QueryResponse, CopilotError>) {
        self.loading = false;
        match result {
            Ok(resp) => {
                if resp.conversation_id.is_some() {
                    self.conversation_id = resp.conversation_id;
                }
                self.transcript
                    .push(ChatMessage::assistant(resp.answer, resp.sources));
            }
            Err(e) => {
                tracing::warn!("query failed: {}", e);
                self.notify(Notice::error(MSG_QUERY_FAILED));
                self.transcript.push(ChatMessage::assistant_error(MSG_ERROR_REPLY));
            }
        }
    }

    /// Ask a question. Returns false when the input was blank and nothing
    /// was sent.
    pub async fn send(&mut self, input: &str) -> bool {
        let Some(request) = self.begin_query(input) else {
            return false;
        };
        let result = self.backend.query(&self.auth, request).await;
        self.finish_query(result);
        true
    }

    /// Start over: drop the transcript and the backend conversation thread.
    pub fn new_conversation(&mut self) {
        self.transcript.clear();
        self.conversation_id = None;
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    // ─── Notices ────────────────────────────────────────────────

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Hand pending notices to the view, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ─── Accessors ──────────────────────────────────────────────

    pub fn backend(&self) -> Arc<dyn KnowledgeBackend> {
        Arc::clone(&self.backend)
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
