// tests/common/mod.rs — Throwaway HTTP backend for client tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;

use kcopilot::client::ApiClient;

/// One request as the backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

pub type Responder = Arc<dyn Fn(&Recorded) -> (u16, String) + Send + Sync>;

#[derive(Clone)]
struct MockState {
    log: Arc<Mutex<Vec<Recorded>>>,
    respond: Responder,
}

pub struct MockServer {
    pub url: url::Url,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    /// Serve every request with `respond` on an ephemeral port.
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
    {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            log: Arc::clone(&log),
            respond: Arc::new(respond),
        };
        let app = Router::new().fallback(handle).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: url::Url::parse(&format!("http://{addr}")).unwrap(),
            log,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.url.clone(), Duration::from_secs(5)).unwrap()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = Recorded {
        method,
        path: uri.path().to_string(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    let (status, body) = (state.respond)(&recorded);
    state.log.lock().unwrap().push(recorded);

    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

pub fn ok(body: serde_json::Value) -> (u16, String) {
    (200, body.to_string())
}

pub fn detail(status: u16, message: &str) -> (u16, String) {
    (status, serde_json::json!({ "detail": message }).to_string())
}
