// src/session/mod.rs — Authenticated session: token, profile, persistence

pub mod store;

use std::sync::Arc;

use crate::client::{Auth, KnowledgeBackend, UserProfile};
use crate::infra::errors::CopilotError;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Holds the bearer token and the profile it resolves to.
///
/// The token is only kept while the backend accepts it: a failed profile
/// fetch clears the token, the cached user and the persisted copy together.
pub struct SessionManager {
    backend: Arc<dyn KnowledgeBackend>,
    store: Box<dyn SessionStore>,
    token: Option<String>,
    user: Option<UserProfile>,
    loading: bool,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn KnowledgeBackend>, store: Box<dyn SessionStore>) -> Self {
        Self {
            backend,
            store,
            token: None,
            user: None,
            loading: false,
        }
    }

    /// Rehydrate from the store. `Ok(false)` when there was nothing to restore.
    pub async fn restore(&mut self) -> Result<bool, CopilotError> {
        let token = match self.store.load()? {
            Some(t) => t,
            None => return Ok(false),
        };
        self.set_token(token).await?;
        Ok(true)
    }

    /// Adopt `token` and fetch the profile once.
    pub async fn set_token(&mut self, token: String) -> Result<UserProfile, CopilotError> {
        self.token = Some(token);
        let auth = self.auth();
        match self.backend.profile(&auth).await {
            Ok(profile) => {
                tracing::debug!(user = %profile.display_name(), "session established");
                self.user = Some(profile.clone());
                Ok(profile)
            }
            Err(e) => {
                tracing::warn!("profile fetch failed, dropping session: {}", e);
                self.logout();
                Err(e)
            }
        }
    }

    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, CopilotError> {
        self.loading = true;
        let result = self.backend.login(username, password).await;
        self.loading = false;

        let token = result.map_err(|e| auth_failure(e, LOGIN_FAILED))?;
        self.adopt(token.access_token, LOGIN_FAILED).await
    }

    pub async fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, CopilotError> {
        self.loading = true;
        let result = self.backend.register(username, email, password).await;
        self.loading = false;

        let token = result.map_err(|e| auth_failure(e, REGISTER_FAILED))?;
        self.adopt(token.access_token, REGISTER_FAILED).await
    }

    async fn adopt(&mut self, token: String, fallback: &str) -> Result<UserProfile, CopilotError> {
        self.store.save(&token)?;
        self.set_token(token)
            .await
            .map_err(|e| auth_failure(e, fallback))
    }

    /// Forget everything. Never fails; a store error is only logged.
    pub fn logout(&mut self) {
        self.token = None;
        self.user = None;
        if let Err(e) = self.store.clear() {
            tracing::warn!("could not clear persisted session: {}", e);
        }
    }

    pub fn auth(&self) -> Auth {
        match &self.token {
            Some(t) => Auth::Bearer(t.clone()),
            None => Auth::Anonymous,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// True only while a login or registration request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn backend(&self) -> Arc<dyn KnowledgeBackend> {
        Arc::clone(&self.backend)
    }
}

fn auth_failure(e: CopilotError, fallback: &str) -> CopilotError {
    CopilotError::AuthFailed {
        message: e.user_message(fallback),
        status: e.status(),
    }
}
