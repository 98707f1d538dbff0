//! Platform client tests against a local stub of the knowledge-base service.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use docvox::error::LookupKind;
use docvox::platform::{FileUpload, PlatformClient};
use docvox::DocvoxError;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct Stub {
    knowledge: Value,
    chat_reply: Value,
    hits: AtomicUsize,
    add_calls: Mutex<Vec<(String, Value)>>,
    chat_bodies: Mutex<Vec<Value>>,
    auth_headers: Mutex<Vec<String>>,
}

impl Stub {
    fn new(knowledge: Value, chat_reply: Value) -> Arc<Self> {
        Arc::new(Self {
            knowledge,
            chat_reply,
            hits: AtomicUsize::new(0),
            add_calls: Mutex::new(Vec::new()),
            chat_bodies: Mutex::new(Vec::new()),
            auth_headers: Mutex::new(Vec::new()),
        })
    }

    fn record(&self, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            self.auth_headers.lock().unwrap().push(auth.to_string());
        }
    }
}

async fn list_knowledge(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Json<Value> {
    stub.record(&headers);
    Json(stub.knowledge.clone())
}

async fn add_file(
    State(stub): State<Arc<Stub>>,
    Path(kb_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(&headers);
    stub.add_calls.lock().unwrap().push((kb_id.clone(), body));
    Json(json!({ "id": kb_id, "status": "ok" }))
}

async fn upload(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Json<Value> {
    stub.record(&headers);
    Json(json!({ "id": "file-1", "filename": "notes.pdf" }))
}

async fn chat(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(&headers);
    stub.chat_bodies.lock().unwrap().push(body);
    Json(stub.chat_reply.clone())
}

async fn models(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Json<Value> {
    stub.record(&headers);
    Json(json!({ "data": [{ "id": "protected.gpt-5" }, { "id": "protected.o3" }] }))
}

async fn spawn(stub: Arc<Stub>) -> PlatformClient {
    let app = Router::new()
        .route("/api/v1/knowledge/list", get(list_knowledge))
        .route("/api/v1/knowledge/{id}/file/add", post(add_file))
        .route("/api/v1/files/", post(upload))
        .route("/openai/chat/completions", post(chat))
        .route("/openai/models", get(models))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let base = format!("http://{}", addr);
    PlatformClient::with_config("test-key", &base, &format!("{}/openai", base)).unwrap()
}

fn docs_snapshot() -> Value {
    json!([
        {
            "id": "kb-docs",
            "name": "Docs",
            "files": [{ "id": "abc", "meta": { "name": "notes.pdf" } }]
        },
        {
            "id": "kb-cs101",
            "name": "CS101",
            "files": [{ "id": "f-42", "meta": { "name": "syllabus.pdf" } }]
        },
        { "id": "kb-empty", "name": "Empty", "files": null }
    ])
}

fn reply(content: &str) -> Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
}

#[tokio::test]
async fn test_chat_with_file_augments_prompts() {
    let stub = Stub::new(docs_snapshot(), reply("answer"));
    let client = spawn(stub.clone()).await;

    let answer = client
        .chat_with_file("Docs", "notes.pdf", "sys", "usr", "m", 0.2)
        .await
        .unwrap();
    assert_eq!(answer, "answer");

    let bodies = stub.chat_bodies.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["model"], "m");
    assert_eq!(body["stream"], false);
    assert!((body["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);

    let system = body["messages"][0]["content"].as_str().unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(system.starts_with("sys"));
    assert!(system.contains("knowledge_base_name: Docs"));
    assert!(system.contains("file_id: abc"));
    assert!(system.contains("filename: notes.pdf"));

    let user = body["messages"][1]["content"].as_str().unwrap();
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(user.starts_with("usr"));
    assert!(user.contains("file_id: abc"));

    assert!(stub
        .auth_headers
        .lock()
        .unwrap()
        .iter()
        .all(|h| h == "Bearer test-key"));
}

#[tokio::test]
async fn test_chat_with_file_second_kb() {
    let stub = Stub::new(docs_snapshot(), reply("syllabus explained"));
    let client = spawn(stub.clone()).await;

    client
        .chat_with_file("CS101", "syllabus.pdf", "Base system.", "Base user.", "m", 0.0)
        .await
        .unwrap();

    let bodies = stub.chat_bodies.lock().unwrap();
    let system = bodies[0]["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("knowledge_base_name: CS101"));
    assert!(system.contains("file_id: f-42"));
    assert!(system.contains("filename: syllabus.pdf"));
}

#[tokio::test]
async fn test_unknown_file_lists_alternatives_without_chat() {
    let stub = Stub::new(docs_snapshot(), reply("unused"));
    let client = spawn(stub.clone()).await;

    let err = client
        .chat_with_file("Docs", "missing.pdf", "sys", "usr", "m", 0.2)
        .await
        .unwrap_err();

    match err {
        DocvoxError::NotFound {
            kind, available, ..
        } => {
            assert_eq!(kind, LookupKind::File);
            assert_eq!(available, vec!["notes.pdf".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(stub.chat_bodies.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_choices_is_remote_error() {
    let stub = Stub::new(docs_snapshot(), json!({ "choices": [] }));
    let client = spawn(stub).await;

    let err = client.chat_completion("sys", "usr", "m", 0.2).await.unwrap_err();
    match err {
        DocvoxError::RemoteService { message, .. } => assert!(message.contains("choices")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_add_file_unknown_kb_skips_add() {
    let stub = Stub::new(docs_snapshot(), reply("unused"));
    let client = spawn(stub.clone()).await;

    let err = client
        .add_file_to_knowledge_base("Nope", "file-1")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DocvoxError::NotFound {
            kind: LookupKind::KnowledgeBase,
            ..
        }
    ));
    assert_eq!(
        err.available().unwrap(),
        &["Docs".to_string(), "CS101".to_string(), "Empty".to_string()]
    );
    assert!(stub.add_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_add_file_posts_file_id() {
    let stub = Stub::new(docs_snapshot(), reply("unused"));
    let client = spawn(stub.clone()).await;

    client
        .add_file_to_knowledge_base("CS101", "file-9")
        .await
        .unwrap();

    let calls = stub.add_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "kb-cs101");
    assert_eq!(calls[0].1, json!({ "file_id": "file-9" }));
}

#[tokio::test]
async fn test_invalid_upload_makes_no_request() {
    let stub = Stub::new(docs_snapshot(), reply("unused"));
    let client = spawn(stub.clone()).await;

    let err = client
        .upload_file(FileUpload::from_bytes(Vec::new(), "notes.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, DocvoxError::Validation(_)));
    assert_eq!(stub.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_without_path_or_bytes_makes_no_request() {
    let stub = Stub::new(docs_snapshot(), reply("unused"));
    let client = spawn(stub.clone()).await;

    let err = client.upload_file(FileUpload::default()).await.unwrap_err();
    assert!(matches!(err, DocvoxError::Validation(_)));

    let only_name = FileUpload {
        filename: Some("notes.pdf".to_string()),
        ..FileUpload::default()
    };
    let err = client.upload_file(only_name).await.unwrap_err();
    assert!(matches!(err, DocvoxError::Validation(_)));

    assert_eq!(stub.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_bytes() {
    let stub = Stub::new(docs_snapshot(), reply("unused"));
    let client = spawn(stub.clone()).await;

    let handle = client
        .upload_file(FileUpload::from_bytes(b"%PDF-1.4".to_vec(), "notes.pdf"))
        .await
        .unwrap();
    assert_eq!(handle.id, "file-1");
    assert_eq!(stub.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_list_models() {
    let stub = Stub::new(docs_snapshot(), reply("unused"));
    let client = spawn(stub).await;

    let models = client.list_models().await.unwrap();
    assert_eq!(models, vec!["protected.gpt-5", "protected.o3"]);
}

#[tokio::test]
async fn test_non_success_status_is_remote_error() {
    let app = Router::new().route(
        "/openai/models",
        get(|| async { (StatusCode::UNAUTHORIZED, "invalid key") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let base = format!("http://{}", addr);
    let client = PlatformClient::with_config("bad", &base, &format!("{}/openai", base)).unwrap();

    let err = client.list_models().await.unwrap_err();
    match err {
        DocvoxError::RemoteService {
            status, message, ..
        } => {
            assert_eq!(status, Some(401));
            assert!(message.contains("invalid key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
