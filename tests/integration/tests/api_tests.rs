//! API Integration Tests
//!
//! Most tests run against the memory backend and need no services.
//! `test_postgres_*` tests additionally require `DATABASE_URL` and are
//! skipped otherwise.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_data, assert_error, contents, fixtures::*, postgres_config, TestServer,
};
use reqwest::StatusCode;

async fn send(server: &TestServer, request: &SendMessage) -> MessageBody {
    let response = server.post("/messages/send", request).await.unwrap();
    assert_data(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: serde_json::Value = assert_data(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_data(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["messageStore"], "healthy");
    assert_eq!(body["checks"]["accountStore"], "healthy");
}

#[tokio::test]
async fn test_request_id_header() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_conversation_scenario() {
    let server = TestServer::start().await.unwrap();

    send(&server, &SendMessage::text("alice", "bob", "hi")).await;
    send(&server, &SendMessage::text("bob", "alice", "hey")).await;
    send(&server, &SendMessage::text("alice", "bob", "bye")).await;

    let response = server
        .get("/messages/conversation/alice/bob?limit=2")
        .await
        .unwrap();
    let conversation: ConversationBody = assert_data(response, StatusCode::OK).await.unwrap();
    assert_eq!(contents(&conversation.messages), vec!["bye", "hey"]);
    assert_eq!(conversation.participants, vec!["alice", "bob"]);
    assert_eq!(conversation.count, 2);

    let response = server.get("/messages/history/alice").await.unwrap();
    let history: HistoryBody = assert_data(response, StatusCode::OK).await.unwrap();
    assert_eq!(history.username, "alice");
    assert_eq!(contents(&history.messages), vec!["bye", "hey", "hi"]);
}

#[tokio::test]
async fn test_conversation_is_symmetric() {
    let server = TestServer::start().await.unwrap();
    send(&server, &SendMessage::text("alice", "carol", "a")).await;
    send(&server, &SendMessage::text("carol", "alice", "b")).await;
    send(&server, &SendMessage::text("alice", "bob", "elsewhere")).await;

    let forward: ConversationBody = assert_data(
        server.get("/messages/conversation/alice/carol").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let backward: ConversationBody = assert_data(
        server.get("/messages/conversation/carol/alice").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    let ids = |c: &ConversationBody| c.messages.iter().map(|m| m.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&forward), ids(&backward));
    assert_eq!(contents(&forward.messages), vec!["b", "a"]);
}

#[tokio::test]
async fn test_limit_truncates_to_newest() {
    let server = TestServer::start().await.unwrap();
    for n in 1..=5 {
        send(&server, &SendMessage::text("bob", "carol", &format!("m{n}"))).await;
    }

    let history: HistoryBody = assert_data(
        server.get("/messages/history/bob?limit=2").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(contents(&history.messages), vec!["m5", "m4"]);

    // Unusable limits fall back to the default
    let history: HistoryBody = assert_data(
        server.get("/messages/history/bob?limit=lots").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(history.count, 5);
}

#[tokio::test]
async fn test_send_message_fields() {
    let server = TestServer::start().await.unwrap();
    let message = send(
        &server,
        &SendMessage::text("alice", "bob", "look").with_kind("image"),
    )
    .await;

    assert!(message.id.parse::<i64>().is_ok());
    assert_eq!(message.sender, "alice");
    assert_eq!(message.recipient, "bob");
    assert_eq!(message.kind, "image");
    assert!(!message.read);
    assert!(message.read_at.is_none());
    assert!(!message.created_at.is_empty());
    assert!(!message.sender_online);
}

#[tokio::test]
async fn test_send_long_content() {
    let server = TestServer::start().await.unwrap();
    let long = "é".repeat(5000);
    let message = send(&server, &SendMessage::text("alice", "bob", &long)).await;
    assert_eq!(message.content, long);

    let history: HistoryBody = assert_data(
        server.get("/messages/history/bob").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(history.count, 1);
}

#[tokio::test]
async fn test_send_validation() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/messages/send", &SendMessage::text("alice", "bob", "   "))
        .await
        .unwrap();
    let error = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error, "content is required");

    let response = server
        .post("/messages/send", &SendMessage::text("", "bob", "hi"))
        .await
        .unwrap();
    let error = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error, "sender is required");

    let response = server.post_raw("/messages/send", "{oops").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();

    // Nothing was persisted
    let history: HistoryBody = assert_data(
        server.get("/messages/history/alice").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(history.count, 0);
}

#[tokio::test]
async fn test_mark_read_is_directional() {
    let server = TestServer::start().await.unwrap();
    send(&server, &SendMessage::text("alice", "bob", "1")).await;
    send(&server, &SendMessage::text("bob", "alice", "2")).await;

    let response = server
        .put("/messages/mark-read", &MarkRead::new("alice", "bob"))
        .await
        .unwrap();
    let marked: MarkReadBody = assert_data(response, StatusCode::OK).await.unwrap();
    assert_eq!(marked.count, 1);

    let response = server
        .put("/messages/mark-read", &MarkRead::new("alice", "bob"))
        .await
        .unwrap();
    let marked: MarkReadBody = assert_data(response, StatusCode::OK).await.unwrap();
    assert_eq!(marked.count, 0);

    let conversation: ConversationBody = assert_data(
        server.get("/messages/conversation/alice/bob").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let from_bob = &conversation.messages[0];
    let from_alice = &conversation.messages[1];
    assert!(!from_bob.read);
    assert!(from_alice.read);
    assert!(from_alice.read_at.is_some());
}

// ============================================================================
// Presence Tests
// ============================================================================

#[tokio::test]
async fn test_connect_and_disconnect() {
    let server = TestServer::start().await.unwrap();

    let response = server.post("/users/connect", &Presence::new("carol")).await.unwrap();
    let update: PresenceUpdateBody = assert_data(response, StatusCode::OK).await.unwrap();
    assert_eq!(update.username, "carol");
    assert!(update.is_online);
    assert_eq!(update.status, "updated");

    let status: UserStatusBody = assert_data(
        server.get("/users/status/carol").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(status.username, "carol");
    assert!(status.is_online);

    let online: OnlineUsersBody =
        assert_data(server.get("/users/online").await.unwrap(), StatusCode::OK)
            .await
            .unwrap();
    assert_eq!(online.users, vec!["carol"]);
    assert_eq!(online.count, 1);

    let response = server
        .post("/users/disconnect", &Presence::new("carol"))
        .await
        .unwrap();
    let update: PresenceUpdateBody = assert_data(response, StatusCode::OK).await.unwrap();
    assert!(!update.is_online);

    let status: UserStatusBody = assert_data(
        server.get("/users/status/carol").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!status.is_online);
}

#[tokio::test]
async fn test_unknown_user_presence() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post("/users/connect", &Presence::new("nobody"))
        .await
        .unwrap();
    let update: PresenceUpdateBody = assert_data(response, StatusCode::OK).await.unwrap();
    assert_eq!(update.status, "unknown_user");

    let status: UserStatusBody = assert_data(
        server.get("/users/status/nobody").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!status.is_online);
}

#[tokio::test]
async fn test_sender_online_snapshot() {
    let server = TestServer::start().await.unwrap();
    server.post("/users/connect", &Presence::new("bob")).await.unwrap();

    let message = send(&server, &SendMessage::text("bob", "alice", "online now")).await;
    assert!(message.sender_online);
}

// ============================================================================
// Routing Tests
// ============================================================================

#[tokio::test]
async fn test_api_prefix_routes() {
    let server = TestServer::start().await.unwrap();
    let response = server
        .post("/api/messages/send", &SendMessage::text("alice", "bob", "legacy"))
        .await
        .unwrap();
    assert_data::<MessageBody>(response, StatusCode::OK)
        .await
        .unwrap();

    let history: HistoryBody = assert_data(
        server.get("/api/messages/history/bob").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(contents(&history.messages), vec!["legacy"]);
}

#[tokio::test]
async fn test_unknown_route() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/does/not/exist").await.unwrap();
    assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Postgres Tests
// ============================================================================

#[tokio::test]
async fn test_postgres_conversation_scenario() {
    let Some(config) = postgres_config() else {
        return;
    };
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");

    let alice = unique_username("alice");
    let bob = unique_username("bob");
    send(&server, &SendMessage::text(&alice, &bob, "hi")).await;
    send(&server, &SendMessage::text(&bob, &alice, "hey")).await;
    send(&server, &SendMessage::text(&alice, &bob, "bye")).await;

    let conversation: ConversationBody = assert_data(
        server
            .get(&format!("/messages/conversation/{alice}/{bob}?limit=2"))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(contents(&conversation.messages), vec!["bye", "hey"]);

    let response = server
        .put("/messages/mark-read", &MarkRead::new(&alice, &bob))
        .await
        .unwrap();
    let marked: MarkReadBody = assert_data(response, StatusCode::OK).await.unwrap();
    assert_eq!(marked.count, 2);
}

#[tokio::test]
async fn test_postgres_unknown_user_is_offline() {
    let Some(config) = postgres_config() else {
        return;
    };
    let server = TestServer::start_with_config(config).await.unwrap();

    let name = unique_username("ghost");
    let status: UserStatusBody = assert_data(
        server.get(&format!("/users/status/{name}")).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!status.is_online);
}
