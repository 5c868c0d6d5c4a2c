// src/dashboard/transcript.rs — In-memory chat history

use chrono::{DateTime, Local};

use crate::client::SourceRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One bubble in the conversation. Never mutated once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub sources: Vec<SourceRef>,
    /// Set on the synthetic reply shown when a query fails.
    pub error: bool,
    pub at: DateTime<Local>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
            error: false,
            at: Local::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<SourceRef>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            sources,
            error: false,
            at: Local::now(),
        }
    }

    pub fn assistant_error(content: impl Into<String>) -> Self {
        Self {
            error: true,
            ..Self::assistant(content, Vec::new())
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Append-only list of messages for the current conversation.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
