use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use faqrelay::config::AiConfig;
use faqrelay::fallback::{FallbackClient, DEFAULT_REPLY};
use faqrelay::service::ChatService;
use faqrelay::storage::{Faq, Sender, SqliteStorage};

fn create_storage(dir: &tempfile::TempDir) -> Arc<SqliteStorage> {
    Arc::new(
        SqliteStorage::new_with_path(dir.path().join("relay.db"))
            .expect("failed to create storage"),
    )
}

fn ai_config(api_base: String) -> AiConfig {
    AiConfig {
        api_key: Some("test-key".to_string()),
        api_base,
        model: "test-model".to_string(),
        timeout_seconds: 5,
    }
}

/// FAQ match answers directly and the AI endpoint is never contacted
#[tokio::test]
async fn test_faq_match_skips_ai_call() {
    let server = MockServer::start().await;

    // Any request reaching the mock would fail the expect(0) check.
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir failed");
    let storage = create_storage(&dir);
    storage
        .insert_faq(&Faq::new("operating hours", "9-5 Mon-Fri", vec![]))
        .expect("insert failed");

    let fallback = FallbackClient::from_config(&ai_config(server.uri()))
        .expect("client build failed")
        .expect("credential configured");
    let service = ChatService::new(storage, Some(fallback));

    let reply = service
        .handle_message("user-1", "what are your operating hours?")
        .await
        .expect("handle failed");
    assert_eq!(reply, "9-5 Mon-Fri");
}

/// No FAQ match and no credential: fixed default reply, no network I/O
#[tokio::test]
async fn test_no_match_without_credential_uses_default_reply() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let storage = create_storage(&dir);

    let service = ChatService::new(storage, None);

    let reply = service
        .handle_message("user-1", "tell me a joke")
        .await
        .expect("handle failed");
    assert_eq!(reply, DEFAULT_REPLY);

    // The default reply is a real bot turn and is persisted.
    let history = service.history("user-1").expect("history failed");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].text, DEFAULT_REPLY);
}

/// Each successful message appends exactly two messages, user then bot
#[tokio::test]
async fn test_handle_message_appends_user_then_bot() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let storage = create_storage(&dir);
    storage
        .insert_faq(&Faq::new("shipping", "3-5 business days", vec![]))
        .expect("insert failed");

    let service = ChatService::new(storage, None);

    service
        .handle_message("user-1", "how long is shipping?")
        .await
        .expect("first message failed");

    let history = service.history("user-1").expect("history failed");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].sender, Sender::User);
    assert_eq!(history[0].text, "how long is shipping?");
    assert_eq!(history[1].sender, Sender::Bot);
    assert_eq!(history[1].text, "3-5 business days");

    service
        .handle_message("user-1", "and shipping to canada?")
        .await
        .expect("second message failed");

    let history = service.history("user-1").expect("history failed");
    assert_eq!(history.len(), 4);
    assert_eq!(history[2].sender, Sender::User);
    assert_eq!(history[3].sender, Sender::Bot);
}

/// updated_at strictly increases across appends
#[tokio::test]
async fn test_updated_at_strictly_increases() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let storage = create_storage(&dir);

    let service = ChatService::new(storage.clone(), None);

    service
        .handle_message("user-1", "first")
        .await
        .expect("first failed");
    let first = storage
        .load_conversation("user-1")
        .expect("load failed")
        .expect("conversation missing");

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    service
        .handle_message("user-1", "second")
        .await
        .expect("second failed");
    let second = storage
        .load_conversation("user-1")
        .expect("load failed")
        .expect("conversation missing");

    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.created_at, first.created_at);
}

/// Persist-then-reload yields the identical ordered message sequence
#[tokio::test]
async fn test_conversation_roundtrip_through_service() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let storage = create_storage(&dir);

    let service = ChatService::new(storage.clone(), None);

    service
        .handle_message("user-1", "one")
        .await
        .expect("one failed");
    service
        .handle_message("user-1", "two")
        .await
        .expect("two failed");

    let loaded = storage
        .load_conversation("user-1")
        .expect("load failed")
        .expect("conversation missing");
    let history = service.history("user-1").expect("history failed");
    assert_eq!(loaded.messages, history);
    assert_eq!(
        history.iter().map(|m| m.sender).collect::<Vec<_>>(),
        vec![Sender::User, Sender::Bot, Sender::User, Sender::Bot]
    );
}

/// Conversations are isolated per user identity
#[tokio::test]
async fn test_conversations_are_per_user() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let storage = create_storage(&dir);

    let service = ChatService::new(storage, None);

    service
        .handle_message("alice", "hello")
        .await
        .expect("alice failed");
    service
        .handle_message("bob", "hi there")
        .await
        .expect("bob failed");

    let alice = service.history("alice").expect("history failed");
    let bob = service.history("bob").expect("history failed");
    assert_eq!(alice.len(), 2);
    assert_eq!(bob.len(), 2);
    assert_eq!(alice[0].text, "hello");
    assert_eq!(bob[0].text, "hi there");
}

/// Concurrent messages for the same user never lose an append
#[tokio::test]
async fn test_concurrent_same_user_messages_all_persisted() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let storage = create_storage(&dir);

    let service = Arc::new(ChatService::new(storage, None));

    let mut handles = Vec::new();
    for i in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .handle_message("user-1", &format!("message {}", i))
                .await
        }));
    }
    for handle in handles {
        handle.await.expect("join failed").expect("handle failed");
    }

    // 8 user messages + 8 bot replies, no interleaving lost to races.
    let history = service.history("user-1").expect("history failed");
    assert_eq!(history.len(), 16);
}

/// FAQ uploads take effect for the next message without restart
#[tokio::test]
async fn test_faq_set_read_fresh_per_message() {
    let dir = tempfile::tempdir().expect("tempdir failed");
    let storage = create_storage(&dir);

    let service = ChatService::new(storage.clone(), None);

    let reply = service
        .handle_message("user-1", "what are your operating hours?")
        .await
        .expect("first failed");
    assert_eq!(reply, DEFAULT_REPLY);

    storage
        .insert_faq(&Faq::new("operating hours", "9-5 Mon-Fri", vec![]))
        .expect("insert failed");

    let reply = service
        .handle_message("user-1", "what are your operating hours?")
        .await
        .expect("second failed");
    assert_eq!(reply, "9-5 Mon-Fri");
}
