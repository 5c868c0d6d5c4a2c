// src/session/store.rs — Persisted bearer token

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::infra::errors::CopilotError;
use crate::infra::paths;

/// Where the session token lives between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, CopilotError>;
    fn save(&self, token: &str) -> Result<(), CopilotError>;
    fn clear(&self) -> Result<(), CopilotError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn load(&self) -> Result<Option<String>, CopilotError> {
        (**self).load()
    }

    fn save(&self, token: &str) -> Result<(), CopilotError> {
        (**self).save(token)
    }

    fn clear(&self) -> Result<(), CopilotError> {
        (**self).clear()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// Token stored as JSON at ~/.kcopilot/session.json, chmod 600 on Unix.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(paths::session_file_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, CopilotError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str::<SessionFile>(&content) {
            Ok(file) if !file.token.is_empty() => Ok(Some(file.token)),
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable session file: {}", e);
                Ok(None)
            }
        }
    }

    fn save(&self, token: &str) -> Result<(), CopilotError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&SessionFile {
            token: token.to_string(),
        })
        .map_err(|e| CopilotError::Other(e.into()))?;

        // Write then rename so a crash never leaves half a token behind.
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, &json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&tmp_path, perms)?;
        }

        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CopilotError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    /// Snapshot of the stored token.
    pub fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|t| t.clone())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, CopilotError> {
        Ok(self.token())
    }

    fn save(&self, token: &str) -> Result<(), CopilotError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| CopilotError::Config("session store lock poisoned".into()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CopilotError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| CopilotError::Config("session store lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}
