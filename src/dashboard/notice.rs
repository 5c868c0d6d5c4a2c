// src/dashboard/notice.rs — Transient notifications

use std::time::{Duration, Instant};

/// How long a view keeps a notice on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created: Instant,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created: Instant::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= NOTICE_TTL
    }
}
