// tests/client_test.rs — ApiClient against a local mock backend

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{detail, ok, MockServer};
use kcopilot::client::{ApiClient, Auth, KnowledgeBackend, QueryRequest};
use kcopilot::files::UploadFile;
use kcopilot::infra::errors::CopilotError;
use kcopilot::session::{MemorySessionStore, SessionManager};

fn documents_json() -> serde_json::Value {
    json!([
        {"id": "d1", "filename": "notes.md", "file_type": "text/markdown",
         "upload_date": "2026-03-14T09:26:53.589793", "processed": true},
        {"id": "d2", "filename": "scan.pdf", "file_type": null,
         "upload_date": "2026-03-15T10:00:00"}
    ])
}

// ─── Authentication ─────────────────────────────────────────────

#[tokio::test]
async fn test_login_token_is_stored_and_sent_as_bearer() {
    let server = MockServer::start(|req| match (req.method.as_str(), req.path.as_str()) {
        ("POST", "/login") => ok(json!({"access_token": "T", "token_type": "bearer"})),
        ("GET", "/profile") => ok(json!({"username": "a", "email": "a@example.com"})),
        ("GET", "/api/documents") => ok(json!([])),
        _ => (404, "{}".into()),
    })
    .await;

    let store = Arc::new(MemorySessionStore::new());
    let mut session = SessionManager::new(Arc::new(server.client()), Box::new(Arc::clone(&store)));

    let user = session.login("a", "b").await.unwrap();
    assert_eq!(user.username, "a");
    assert_eq!(store.token().as_deref(), Some("T"));

    session
        .backend()
        .list_documents(&session.auth())
        .await
        .unwrap();

    let requests = server.requests();
    let login = &requests[0];
    assert_eq!(login.path, "/login");
    assert_eq!(login.json(), json!({"username": "a", "password": "b"}));
    assert_eq!(login.authorization, None);

    for req in &requests[1..] {
        assert_eq!(req.authorization.as_deref(), Some("Bearer T"), "{}", req.path);
    }
    assert_eq!(server.count(Method::GET, "/profile"), 1);
}

#[tokio::test]
async fn test_register_sends_all_fields() {
    let server = MockServer::start(|_| ok(json!({"access_token": "R"}))).await;
    let client = server.client();

    let token = client.register("ada", "ada@example.com", "pw").await.unwrap();
    assert_eq!(token.access_token, "R");
    assert_eq!(token.token_type, None);
    assert_eq!(
        server.requests()[0].json(),
        json!({"username": "ada", "email": "ada@example.com", "password": "pw"})
    );
}

#[tokio::test]
async fn test_anonymous_requests_carry_no_authorization() {
    let server = MockServer::start(|_| ok(json!([]))).await;
    server
        .client()
        .list_documents(&Auth::Anonymous)
        .await
        .unwrap();
    assert_eq!(server.requests()[0].authorization, None);
}

// ─── Documents ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_documents() {
    let server = MockServer::start(|_| ok(documents_json())).await;
    let docs = server
        .client()
        .list_documents(&Auth::bearer("T"))
        .await
        .unwrap();

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].filename, "notes.md");
    assert_eq!(docs[0].file_type.as_deref(), Some("text/markdown"));
    assert_eq!(docs[1].file_type, None);
    assert!(!docs[1].processed);
}

#[tokio::test]
async fn test_upload_is_multipart_with_file_field() {
    let server = MockServer::start(|_| {
        ok(json!({"message": "Document uploaded and processed successfully",
                  "document_id": "d9", "chunks_processed": 3}))
    })
    .await;

    let file = UploadFile::new("notes.md", b"# Heading\nbody".to_vec());
    let resp = server
        .client()
        .upload_document(&Auth::bearer("T"), file)
        .await
        .unwrap();
    assert_eq!(resp.document_id.as_deref(), Some("d9"));
    assert_eq!(resp.chunks_processed, Some(3));

    let req = &server.requests()[0];
    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path, "/api/upload");
    assert!(req
        .content_type
        .as_deref()
        .unwrap_or_default()
        .starts_with("multipart/form-data; boundary="));
    assert!(req.body.contains(r#"name="file""#));
    assert!(req.body.contains(r#"filename="notes.md""#));
    assert!(req
        .body
        .to_ascii_lowercase()
        .contains("content-type: text/markdown"));
    assert!(req.body.contains("# Heading\nbody"));
}

#[tokio::test]
async fn test_upload_tolerates_unexpected_body() {
    let server = MockServer::start(|_| (200, "ok".into())).await;
    let resp = server
        .client()
        .upload_document(&Auth::Anonymous, UploadFile::new("a.txt", b"x".to_vec()))
        .await
        .unwrap();
    assert!(resp.document_id.is_none());
}

#[tokio::test]
async fn test_delete_encodes_document_id() {
    let server = MockServer::start(|_| ok(json!({"message": "Document deleted successfully"}))).await;
    server
        .client()
        .delete_document(&Auth::bearer("T"), "a b/c")
        .await
        .unwrap();

    let req = &server.requests()[0];
    assert_eq!(req.method, Method::DELETE);
    assert_eq!(req.path, "/api/documents/a%20b%2Fc");
}

// ─── Query ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_query_round_trip() {
    let server = MockServer::start(|_| {
        ok(json!({
            "answer": "X is Y.",
            "sources": [{"filename": "notes.md", "content_preview": "X is..."}],
            "conversation_id": "c-1"
        }))
    })
    .await;

    let resp = server
        .client()
        .query(&Auth::Anonymous, QueryRequest::new("What is X?", Some("c-0".into())))
        .await
        .unwrap();

    assert_eq!(resp.answer, "X is Y.");
    assert_eq!(resp.sources[0].filename, "notes.md");
    assert_eq!(resp.conversation_id.as_deref(), Some("c-1"));
    assert_eq!(
        server.requests()[0].json(),
        json!({"question": "What is X?", "context": {"conversation_id": "c-0"}})
    );
}

// ─── Errors ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_detail_is_extracted() {
    let server = MockServer::start(|_| detail(400, "Unsupported file type")).await;
    let err = server
        .client()
        .upload_document(&Auth::Anonymous, UploadFile::new("x.exe", vec![1]))
        .await
        .unwrap_err();

    assert!(matches!(err, CopilotError::Http { status: 400, .. }));
    assert_eq!(err.detail(), Some("Unsupported file type"));
    assert_eq!(err.user_message("Unknown error"), "Unsupported file type");
}

#[tokio::test]
async fn test_unauthorized_is_typed() {
    let server = MockServer::start(|_| detail(401, "Incorrect username or password")).await;
    let err = server.client().login("a", "wrong").await.unwrap_err();
    assert!(matches!(err, CopilotError::Unauthorized { .. }));
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_server_error_without_json_body() {
    let server = MockServer::start(|_| (500, "Internal Server Error".into())).await;
    let err = server
        .client()
        .query(&Auth::Anonymous, QueryRequest::new("q", None))
        .await
        .unwrap_err();
    assert!(matches!(err, CopilotError::Server { status: 500, detail: None }));
    assert_eq!(err.user_message("Unknown error"), "Unknown error");
}

#[tokio::test]
async fn test_no_retry_on_failure() {
    let server = MockServer::start(|_| (503, "{}".into())).await;
    let _ = server.client().list_documents(&Auth::Anonymous).await;
    assert_eq!(server.count(Method::GET, "/api/documents"), 1);
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let server = MockServer::start(|_| (200, "not json".into())).await;
    let err = server
        .client()
        .list_documents(&Auth::Anonymous)
        .await
        .unwrap_err();
    assert!(matches!(err, CopilotError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ApiClient::new(
        url::Url::parse(&format!("http://127.0.0.1:{port}")).unwrap(),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = client.health().await.unwrap_err();
    assert!(matches!(err, CopilotError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start(|req| {
        assert_eq!(req.path, "/");
        ok(json!({"message": "Knowledge Copilot API"}))
    })
    .await;
    let health = server.client().health().await.unwrap();
    assert_eq!(health.message, "Knowledge Copilot API");
}
