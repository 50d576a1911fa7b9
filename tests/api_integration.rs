//! Integration tests against a mock assistant API.
//!
//! Each test spins up an axum server on an ephemeral port that mimics the
//! four backend endpoints and records what it receives.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use assistant_chat::api::{ApiError, AskRequest, AssistantBackend, Client};
use assistant_chat::session::{ChatSession, MessageRole, SelectionKind, SendOutcome};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};

// =============================================================================
// Mock Backend
// =============================================================================

#[derive(Clone, Default)]
struct MockApi {
    fail_assistants: bool,
    fail_ask: bool,
    threads: Arc<AtomicUsize>,
    asks: Arc<Mutex<Vec<Value>>>,
    content_types: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    fn record_content_type(&self, headers: &HeaderMap) {
        let value = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        self.content_types.lock().unwrap().push(value);
    }

    fn asks(&self) -> Vec<Value> {
        self.asks.lock().unwrap().clone()
    }
}

async fn list_assistants(State(api): State<MockApi>, headers: HeaderMap) -> impl IntoResponse {
    api.record_content_type(&headers);
    if api.fail_assistants {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    Json(json!({
        "assistants": [
            { "id": "asst_1", "name": "Soporte" },
            { "id": "asst_2", "name": null }
        ]
    }))
    .into_response()
}

async fn list_vector_stores(State(api): State<MockApi>, headers: HeaderMap) -> Json<Value> {
    api.record_content_type(&headers);
    Json(json!({ "vector_stores": [ { "id": "vs_1", "name": "Manuales" } ] }))
}

async fn create_thread(State(api): State<MockApi>, headers: HeaderMap) -> Json<Value> {
    api.record_content_type(&headers);
    let n = api.threads.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "thread_id": format!("thread_{n}") }))
}

async fn ask(State(api): State<MockApi>, Json(body): Json<Value>) -> impl IntoResponse {
    let query = body["query"].as_str().unwrap_or_default().to_string();
    api.asks.lock().unwrap().push(body);
    if api.fail_ask {
        return (StatusCode::BAD_GATEWAY, "upstream down").into_response();
    }
    Json(json!({ "response": format!("Respuesta a {query}") })).into_response()
}

/// Start the mock API and return its base URL.
async fn spawn(api: MockApi) -> String {
    let router = Router::new()
        .route("/list-assistants", get(list_assistants))
        .route("/list-vector-stores", get(list_vector_stores))
        .route("/create-thread", post(create_thread))
        .route("/ask/assistant", post(ask))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// =============================================================================
// Client
// =============================================================================

#[tokio::test]
async fn test_client_lists_catalog() {
    let api = MockApi::default();
    let client = Client::new(spawn(api.clone()).await).unwrap();

    let assistants = client.list_assistants().await.unwrap();
    assert_eq!(assistants.len(), 2);
    assert_eq!(assistants[0].id, "asst_1");
    assert_eq!(assistants[1].name, None);

    let stores = client.list_vector_stores().await.unwrap();
    assert_eq!(stores[0].name.as_deref(), Some("Manuales"));

    let content_types = api.content_types.lock().unwrap().clone();
    assert!(content_types.iter().all(|ct| ct == "application/json"));
}

#[tokio::test]
async fn test_client_creates_threads() {
    let api = MockApi::default();
    let client = Client::new(spawn(api.clone()).await).unwrap();

    assert_eq!(client.create_thread().await.unwrap(), "thread_1");
    assert_eq!(client.create_thread().await.unwrap(), "thread_2");
    assert_eq!(
        api.content_types.lock().unwrap().as_slice(),
        ["application/json", "application/json"]
    );
}

#[tokio::test]
async fn test_client_ask_body() {
    let api = MockApi::default();
    let client = Client::new(spawn(api.clone()).await).unwrap();

    let response = client
        .ask(&AskRequest {
            thread_id: None,
            query: "Hola".into(),
            assistant_id: "asst_1".into(),
            vector_store_id: String::new(),
        })
        .await
        .unwrap();

    assert_eq!(response, "Respuesta a Hola");
    assert_eq!(
        api.asks(),
        vec![json!({
            "thread_id": null,
            "query": "Hola",
            "assistant_id": "asst_1",
            "vector_store_id": ""
        })]
    );
}

#[tokio::test]
async fn test_client_maps_error_status() {
    let api = MockApi {
        fail_assistants: true,
        ..MockApi::default()
    };
    let client = Client::new(spawn(api).await).unwrap();

    match client.list_assistants().await.unwrap_err() {
        ApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_client_connection_refused() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::new(format!("http://{addr}")).unwrap();
    let err = client.create_thread().await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
    assert_eq!(err.status(), None);
}

// =============================================================================
// Session over HTTP
// =============================================================================

#[tokio::test]
async fn test_session_round_trip() {
    let api = MockApi::default();
    let client = Client::new(spawn(api.clone()).await).unwrap();
    let mut session = ChatSession::new(Arc::new(client));

    let report = session.bootstrap().await;
    assert!(report.is_ok());
    assert_eq!(session.thread_id(), Some("thread_1"));

    let assistants = session
        .selection()
        .candidates(SelectionKind::Assistant)
        .unwrap();
    assert_eq!(assistants[0].label, "Soporte");
    assert_eq!(assistants[1].label, "Sin Nombre");

    session.choose(SelectionKind::Assistant, "asst_1");
    session.choose(SelectionKind::VectorStore, "vs_1");
    session.set_draft("Hola");
    assert_eq!(session.send().await.unwrap(), SendOutcome::Answered);

    let messages = session.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, MessageRole::User);
    assert_eq!(messages[2].role, MessageRole::Assistant);
    assert_eq!(messages[2].content, "Respuesta a Hola");

    assert_eq!(
        api.asks(),
        vec![json!({
            "thread_id": "thread_1",
            "query": "Hola",
            "assistant_id": "asst_1",
            "vector_store_id": "vs_1"
        })]
    );
}

#[tokio::test]
async fn test_session_survives_catalog_failure() {
    let api = MockApi {
        fail_assistants: true,
        ..MockApi::default()
    };
    let client = Client::new(spawn(api.clone()).await).unwrap();
    let mut session = ChatSession::new(Arc::new(client));

    let report = session.bootstrap().await;

    assert!(report.catalog.is_err());
    assert!(!session.is_data_loading());
    assert!(session.selection().candidates(SelectionKind::Assistant).is_none());
    assert_eq!(session.thread_id(), Some("thread_1"));

    session.set_draft("¿Sigues ahí?");
    session.send().await.unwrap();
    assert_eq!(session.messages().len(), 3);
}

#[tokio::test]
async fn test_session_ask_failure_keeps_user_message() {
    let api = MockApi {
        fail_ask: true,
        ..MockApi::default()
    };
    let client = Client::new(spawn(api.clone()).await).unwrap();
    let mut session = ChatSession::new(Arc::new(client));
    session.bootstrap().await;

    session.set_draft("Hola");
    assert!(session.send().await.is_err());

    assert_eq!(session.messages().len(), 2);
    assert!(!session.is_pending());
    assert_eq!(session.composer().draft(), "");
    assert_eq!(api.asks().len(), 1);
}

#[tokio::test]
async fn test_bootstrap_twice_creates_one_thread() {
    let api = MockApi::default();
    let client = Client::new(spawn(api.clone()).await).unwrap();
    let mut session = ChatSession::new(Arc::new(client));

    session.bootstrap().await;
    session.bootstrap().await;

    assert_eq!(api.threads.load(Ordering::SeqCst), 1);

    session.back();
    session.bootstrap().await;
    assert_eq!(api.threads.load(Ordering::SeqCst), 2);
    assert_eq!(session.thread_id(), Some("thread_2"));
}
