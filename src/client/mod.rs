// src/client/mod.rs — HTTP client for the Knowledge Copilot REST API
//
// One reqwest client with a fixed base URL, JSON default headers and a
// request timeout. Authentication is passed explicitly on every call; there
// is no process-wide default header. Failures are logged (401 and 5xx) and
// returned as-is: no retry, no backoff.

pub mod types;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::files::UploadFile;
use crate::infra::config::Config;
use crate::infra::errors::{extract_detail, CopilotError};
pub use types::{
    DocumentInfo, HealthResponse, LoginRequest, QueryRequest, QueryResponse, RegisterRequest,
    SourceRef, TokenResponse, UploadResponse, UserProfile,
};

/// Credentials attached to a single request.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
    #[default]
    Anonymous,
    Bearer(String),
}

impl Auth {
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Auth::Anonymous => None,
            Auth::Bearer(t) => Some(t),
        }
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Auth::Anonymous => builder,
            Auth::Bearer(token) => builder.bearer_auth(token),
        }
    }
}

// Tokens never end up in logs.
impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::Anonymous => f.write_str("Anonymous"),
            Auth::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Everything the client front-end needs from the backend.
///
/// `ApiClient` is the real implementation; tests substitute their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KnowledgeBackend: Send + Sync {
    async fn list_documents(&self, auth: &Auth) -> Result<Vec<DocumentInfo>, CopilotError>;

    async fn upload_document(
        &self,
        auth: &Auth,
        file: UploadFile,
    ) -> Result<UploadResponse, CopilotError>;

    async fn delete_document(&self, auth: &Auth, document_id: &str) -> Result<(), CopilotError>;

    async fn query(&self, auth: &Auth, request: QueryRequest)
        -> Result<QueryResponse, CopilotError>;

    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, CopilotError>;

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, CopilotError>;

    async fn profile(&self, auth: &Auth) -> Result<UserProfile, CopilotError>;

    /// `GET /`, the backend's liveness message.
    async fn health(&self) -> Result<HealthResponse, CopilotError>;
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: url::Url,
}

impl ApiClient {
    pub fn new(base_url: url::Url, timeout: Duration) -> Result<Self, CopilotError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .user_agent(concat!("kcopilot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Build from config, honouring `--api-url` and `KCOPILOT_API_URL`.
    pub fn from_config(config: &Config, api_url: Option<&str>) -> Result<Self, CopilotError> {
        Self::new(config.api_url(api_url)?, config.timeout())
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// `path` is appended to the base URL, keeping any prefix the base has.
    fn endpoint(&self, path: &str) -> Result<url::Url, CopilotError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let raw = format!("{base}{path}");
        url::Url::parse(&raw).map_err(|e| CopilotError::InvalidUrl {
            url: raw,
            message: e.to_string(),
        })
    }

    fn request(&self, method: Method, url: url::Url, auth: &Auth) -> RequestBuilder {
        tracing::debug!(%method, %url, auth = ?auth, "request");
        auth.apply(self.client.request(method, url))
    }

    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> Result<Response, CopilotError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(endpoint, "request failed: {}", e);
            CopilotError::Transport(e)
        })?;
        check_status(endpoint, response).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T, CopilotError> {
        let response = self.send(endpoint, builder).await?;
        response.json::<T>().await.map_err(|e| CopilotError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }
}

/// Turn a non-success response into an error, logging the two classes the
/// user can act on.
async fn check_status(endpoint: &str, response: Response) -> Result<Response, CopilotError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::UNAUTHORIZED {
        tracing::error!(endpoint, "Unauthorized access");
    } else if status.is_server_error() {
        tracing::error!(endpoint, status = status.as_u16(), body = %body, "Server error");
    } else {
        tracing::debug!(endpoint, status = status.as_u16(), "request rejected");
    }

    Err(CopilotError::from_status(
        status.as_u16(),
        extract_detail(&body),
    ))
}

#[async_trait]
impl KnowledgeBackend for ApiClient {
    async fn list_documents(&self, auth: &Auth) -> Result<Vec<DocumentInfo>, CopilotError> {
        let url = self.endpoint("/api/documents")?;
        self.send_json("/api/documents", self.request(Method::GET, url, auth))
            .await
    }

    async fn upload_document(
        &self,
        auth: &Auth,
        file: UploadFile,
    ) -> Result<UploadResponse, CopilotError> {
        let url = self.endpoint("/api/upload")?;
        let size = file.bytes.len();
        let part = reqwest::multipart::Part::bytes(file.bytes)
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        tracing::debug!(filename = %file.filename, size, "uploading");
        let response = self
            .send("/api/upload", self.request(Method::POST, url, auth).multipart(form))
            .await?;

        // The document list is the source of truth; a body we can't read is fine.
        Ok(response.json::<UploadResponse>().await.unwrap_or_default())
    }

    async fn delete_document(&self, auth: &Auth, document_id: &str) -> Result<(), CopilotError> {
        let mut url = self.endpoint("/api/documents")?;
        url.path_segments_mut()
            .map_err(|_| CopilotError::InvalidUrl {
                url: self.base_url.to_string(),
                message: "cannot be a base".into(),
            })?
            .push(document_id);

        self.send("/api/documents/{id}", self.request(Method::DELETE, url, auth))
            .await?;
        Ok(())
    }

    async fn query(
        &self,
        auth: &Auth,
        request: QueryRequest,
    ) -> Result<QueryResponse, CopilotError> {
        let url = self.endpoint("/api/query")?;
        self.send_json(
            "/api/query",
            self.request(Method::POST, url, auth).json(&request),
        )
        .await
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, CopilotError> {
        let url = self.endpoint("/login")?;
        let body = LoginRequest { username, password };
        self.send_json(
            "/login",
            self.request(Method::POST, url, &Auth::Anonymous).json(&body),
        )
        .await
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, CopilotError> {
        let url = self.endpoint("/register")?;
        let body = RegisterRequest {
            username,
            email,
            password,
        };
        self.send_json(
            "/register",
            self.request(Method::POST, url, &Auth::Anonymous).json(&body),
        )
        .await
    }

    async fn profile(&self, auth: &Auth) -> Result<UserProfile, CopilotError> {
        let url = self.endpoint("/profile")?;
        self.send_json("/profile", self.request(Method::GET, url, auth))
            .await
    }

    async fn health(&self) -> Result<HealthResponse, CopilotError> {
        let url = self.endpoint("/")?;
        self.send_json("/", self.request(Method::GET, url, &Auth::Anonymous))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(url::Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_appends_path() {
        let c = client("http://localhost:8000");
        assert_eq!(
            c.endpoint("/api/documents").unwrap().as_str(),
            "http://localhost:8000/api/documents"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let c = client("https://example.com/copilot/");
        assert_eq!(
            c.endpoint("/api/query").unwrap().as_str(),
            "https://example.com/copilot/api/query"
        );
    }

    #[test]
    fn test_auth_token() {
        assert_eq!(Auth::Anonymous.token(), None);
        assert_eq!(Auth::bearer("T").token(), Some("T"));
        assert_eq!(Auth::default(), Auth::Anonymous);
    }

    #[test]
    fn test_auth_debug_redacts_token() {
        let shown = format!("{:?}", Auth::bearer("super-secret"));
        assert!(!shown.contains("super-secret"));
        assert_eq!(shown, "Bearer(<redacted>)");
    }
}
