use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use faqrelay::fallback::DEFAULT_REPLY;
use faqrelay::server::{build_router, AppState};
use faqrelay::service::ChatService;
use faqrelay::storage::{Faq, SqliteStorage};

/// Build a router over a fresh temp database with no AI credential
fn create_test_app() -> (Router, Arc<SqliteStorage>, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let storage = Arc::new(
        SqliteStorage::new_with_path(dir.path().join("relay.db"))
            .expect("failed to create storage"),
    );
    let service = Arc::new(ChatService::new(storage.clone(), None));
    let app = build_router(AppState {
        service,
        storage: storage.clone(),
    });
    (app, storage, dir)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request build failed")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request build failed")
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read failed");
    serde_json::from_slice(&bytes).expect("body is not JSON")
}

#[tokio::test]
async fn test_chat_returns_faq_answer() {
    let (app, storage, _dir) = create_test_app();
    storage
        .insert_faq(&Faq::new("operating hours", "9-5 Mon-Fri", vec![]))
        .expect("insert failed");

    let response = app
        .oneshot(post_json(
            "/api/chat",
            json!({"userId": "user-1", "message": "what are your operating hours?"}),
        ))
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({"response": "9-5 Mon-Fri"}));
}

#[tokio::test]
async fn test_chat_missing_user_id_is_400() {
    let (app, _storage, _dir) = create_test_app();

    let response = app
        .oneshot(post_json("/api/chat", json!({"message": "hello"})))
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "User ID and message are required.");
}

#[tokio::test]
async fn test_chat_missing_message_is_400() {
    let (app, _storage, _dir) = create_test_app();

    let response = app
        .oneshot(post_json("/api/chat", json!({"userId": "user-1"})))
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_empty_fields_are_400() {
    let (app, _storage, _dir) = create_test_app();

    let response = app
        .oneshot(post_json(
            "/api/chat",
            json!({"userId": "", "message": ""}),
        ))
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_validation_failure_leaves_no_history() {
    let (app, _storage, _dir) = create_test_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/chat", json!({"userId": "user-1"})))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get("/api/history/user-1"))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn test_history_returns_messages_in_append_order() {
    let (app, _storage, _dir) = create_test_app();

    for message in ["first", "second"] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/chat",
                json!({"userId": "user-1", "message": message}),
            ))
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(get("/api/history/user-1"))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let messages = body["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["sender"], "user");
    assert_eq!(messages[0]["text"], "first");
    assert_eq!(messages[1]["sender"], "bot");
    assert_eq!(messages[1]["text"], DEFAULT_REPLY);
    assert_eq!(messages[2]["sender"], "user");
    assert_eq!(messages[2]["text"], "second");
    assert_eq!(messages[3]["sender"], "bot");
}

#[tokio::test]
async fn test_history_unknown_user_is_empty() {
    let (app, _storage, _dir) = create_test_app();

    let response = app
        .oneshot(get("/api/history/never-seen"))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn test_upload_faq_creates_record() {
    let (app, storage, _dir) = create_test_app();

    let response = app
        .oneshot(post_json(
            "/api/admin/upload-faq",
            json!({"question": "refund policy", "answer": "30 days", "tags": ["billing"]}),
        ))
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["question"], "refund policy");
    assert_eq!(body["answer"], "30 days");
    assert_eq!(body["tags"], json!(["billing"]));

    let faqs = storage.list_faqs().expect("list failed");
    assert_eq!(faqs.len(), 1);
}

#[tokio::test]
async fn test_upload_faq_missing_answer_is_400() {
    let (app, _storage, _dir) = create_test_app();

    let response = app
        .oneshot(post_json(
            "/api/admin/upload-faq",
            json!({"question": "refund policy"}),
        ))
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_duplicate_faq_is_409_and_count_unchanged() {
    let (app, storage, _dir) = create_test_app();
    storage
        .insert_faq(&Faq::new("refund policy", "30 days", vec![]))
        .expect("insert failed");

    let response = app
        .oneshot(post_json(
            "/api/admin/upload-faq",
            json!({"question": "refund policy", "answer": "different"}),
        ))
        .await
        .expect("request failed");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "FAQ question already exists.");

    let faqs = storage.list_faqs().expect("list failed");
    assert_eq!(faqs.len(), 1);
    assert_eq!(faqs[0].answer, "30 days");
}

#[tokio::test]
async fn test_admin_faqs_lists_all_records() {
    let (app, storage, _dir) = create_test_app();
    storage
        .insert_faq(&Faq::new("alpha", "a", vec![]))
        .expect("insert alpha");
    storage
        .insert_faq(&Faq::new("beta", "b", vec!["tag".to_string()]))
        .expect("insert beta");

    let response = app
        .oneshot(get("/api/admin/faqs"))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let faqs = body.as_array().expect("faqs array");
    assert_eq!(faqs.len(), 2);
    assert_eq!(faqs[0]["question"], "alpha");
    assert_eq!(faqs[1]["question"], "beta");
    assert_eq!(faqs[1]["tags"], json!(["tag"]));
}
