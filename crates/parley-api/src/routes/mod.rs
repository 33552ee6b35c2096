//! Route definitions
//!
//! Message and presence routes are served at the root and, for older
//! clients, under `/api` as well.

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{health, index, messages, users};
use crate::state::AppState;

/// Create the main router with all routes and the JSON 404 fallback
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index::service_info))
        .merge(health_routes())
        .merge(api_routes())
        .nest("/api", api_routes())
        .fallback(index::not_found)
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(message_routes())
        .merge(user_routes())
}

/// Message store routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages/history/:username", get(messages::get_history))
        .route(
            "/messages/conversation/:user1/:user2",
            get(messages::get_conversation),
        )
        .route("/messages/send", post(messages::send_message))
        .route("/messages/mark-read", put(messages::mark_read))
}

/// Presence routes
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/online", get(users::list_online))
        .route("/users/status/:username", get(users::get_status))
        .route("/users/connect", post(users::connect))
        .route("/users/disconnect", post(users::disconnect))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use parley_common::AppConfig;
    use parley_db::{InMemoryMessageRepository, InMemoryPresenceRepository};
    use parley_service::ServiceContext;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::server::{create_app, create_app_state};
    use crate::state::AppState;

    async fn app() -> axum::Router {
        let state = create_app_state(AppConfig::in_memory(["alice", "bob"]))
            .await
            .unwrap();
        create_app(state)
    }

    async fn call(
        app: &axum::Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn send(app: &axum::Router, sender: &str, recipient: &str, content: &str) -> Value {
        let (status, body) = call(
            app,
            Method::POST,
            "/messages/send",
            Some(json!({"sender": sender, "recipient": recipient, "content": content})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    fn contents(body: &Value) -> Vec<&str> {
        body["data"]["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_conversation_scenario() {
        let app = app().await;
        send(&app, "alice", "bob", "hi").await;
        send(&app, "bob", "alice", "hey").await;
        send(&app, "alice", "bob", "bye").await;

        let (status, body) = call(
            &app,
            Method::GET,
            "/messages/conversation/alice/bob?limit=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(contents(&body), vec!["bye", "hey"]);
        assert_eq!(body["data"]["participants"], json!(["alice", "bob"]));
        assert_eq!(body["data"]["count"], 2);

        let (_, body) = call(&app, Method::GET, "/messages/history/alice", None).await;
        assert_eq!(contents(&body), vec!["bye", "hey", "hi"]);
        assert_eq!(body["data"]["username"], "alice");
    }

    #[tokio::test]
    async fn test_send_returns_message() {
        let app = app().await;
        let body = send(&app, "alice", "bob", "hello").await;
        let message = &body["data"];
        assert!(message["id"].is_string());
        assert_eq!(message["type"], "text");
        assert_eq!(message["read"], false);
        assert_eq!(message["senderOnline"], false);
        assert!(message["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_send_accepts_long_content() {
        let app = app().await;
        let long = "x".repeat(5000);
        let body = send(&app, "alice", "bob", &long).await;
        assert_eq!(body["data"]["content"].as_str().unwrap().len(), 5000);
    }

    #[tokio::test]
    async fn test_limit_keeps_leading_digits() {
        let app = app().await;
        for content in ["one", "two", "three", "four"] {
            send(&app, "alice", "bob", content).await;
        }

        let (status, body) = call(&app, Method::GET, "/messages/history/bob?limit=2.5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(contents(&body), vec!["four", "three"]);

        let (_, body) = call(
            &app,
            Method::GET,
            "/messages/conversation/alice/bob?limit=3abc",
            None,
        )
        .await;
        assert_eq!(contents(&body), vec!["four", "three", "two"]);

        let (_, body) = call(&app, Method::GET, "/messages/history/bob?limit=abc", None).await;
        assert_eq!(body["data"]["count"], 4);
    }

    #[tokio::test]
    async fn test_send_records_sender_presence() {
        let app = app().await;
        let connect = json!({"username": "alice"});
        call(&app, Method::POST, "/users/connect", Some(connect)).await;
        let body = send(&app, "alice", "bob", "I'm here").await;
        assert_eq!(body["data"]["senderOnline"], true);
    }

    #[tokio::test]
    async fn test_send_missing_content_is_rejected() {
        let app = app().await;
        let (status, body) = call(
            &app,
            Method::POST,
            "/messages/send",
            Some(json!({"sender": "alice", "recipient": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"success": false, "error": "content is required"}));

        let (_, body) = call(&app, Method::GET, "/messages/history/alice", None).await;
        assert_eq!(body["data"]["count"], 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let app = app().await;
        let request = Request::builder()
            .method(Method::POST)
            .uri("/messages/send")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_mark_read_is_directional() {
        let app = app().await;
        send(&app, "alice", "bob", "one").await;
        send(&app, "alice", "bob", "two").await;
        send(&app, "bob", "alice", "three").await;

        let (status, body) = call(
            &app,
            Method::PUT,
            "/messages/mark-read",
            Some(json!({"sender": "alice", "recipient": "bob"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 2);

        let (_, body) = call(&app, Method::GET, "/messages/conversation/bob/alice", None).await;
        let reads: Vec<bool> = body["data"]["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["read"].as_bool().unwrap())
            .collect();
        assert_eq!(reads, vec![false, true, true]);

        let (status, body) = call(
            &app,
            Method::PUT,
            "/messages/mark-read",
            Some(json!({"sender": "alice"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "recipient is required");
    }

    #[tokio::test]
    async fn test_presence_flow() {
        let app = app().await;

        let bob = json!({"username": "bob"});
        let (status, body) = call(&app, Method::POST, "/users/connect", Some(bob.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["data"],
            json!({"username": "bob", "isOnline": true, "status": "updated"})
        );

        let (_, body) = call(&app, Method::GET, "/users/online", None).await;
        assert_eq!(body["data"], json!({"users": ["bob"], "count": 1}));

        let (_, body) = call(&app, Method::GET, "/users/status/bob", None).await;
        assert_eq!(body["data"], json!({"username": "bob", "isOnline": true}));

        call(&app, Method::POST, "/users/disconnect", Some(bob)).await;
        let (_, body) = call(&app, Method::GET, "/users/status/bob", None).await;
        assert_eq!(body["data"]["isOnline"], false);
    }

    #[tokio::test]
    async fn test_unknown_user_presence() {
        let app = app().await;
        let mallory = json!({"username": "mallory"});
        let (status, body) = call(&app, Method::POST, "/users/connect", Some(mallory)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "unknown_user");

        let (status, body) = call(&app, Method::GET, "/users/status/mallory", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["isOnline"], false);
    }

    #[tokio::test]
    async fn test_api_prefix() {
        let app = app().await;
        let (status, _) = call(
            &app,
            Method::POST,
            "/api/messages/send",
            Some(json!({"sender": "alice", "recipient": "bob", "content": "prefixed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&app, Method::GET, "/api/messages/history/bob", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(contents(&body), vec!["prefixed"]);
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = app().await;
        let (status, body) = call(&app, Method::GET, "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("/nope"));
    }

    #[tokio::test]
    async fn test_index_and_health() {
        let app = app().await;
        let (status, body) = call(&app, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "parley");
        assert!(body["data"]["endpoints"].as_array().unwrap().len() >= 6);

        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "healthy");

        let (status, body) = call(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ready");
        assert_eq!(body["data"]["checks"]["presenceSchema"], "full");
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let messages = Arc::new(InMemoryMessageRepository::new());
        let ctx = ServiceContext::builder()
            .message_repo(messages.clone())
            .presence_repo(Arc::new(InMemoryPresenceRepository::with_usernames(["alice"])))
            .build()
            .unwrap();
        let app = create_app(AppState::new(ctx, AppConfig::in_memory(["alice"])));
        messages.set_unavailable(true);

        let (status, body) = call(&app, Method::GET, "/messages/history/alice", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false, "error": "Internal server error"}));

        let (status, body) = call(&app, Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["data"]["checks"]["messageStore"], "unhealthy");
    }
}
