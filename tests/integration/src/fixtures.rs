//! Test fixtures and data generators
//!
//! Request bodies and response shapes for the REST API.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Username unlikely to collide with rows left by earlier runs
pub fn unique_username(prefix: &str) -> String {
    format!("{prefix}_{}_{}", std::process::id(), unique_suffix())
}

/// POST /messages/send body
#[derive(Debug, Serialize)]
pub struct SendMessage {
    pub sender: String,
    pub recipient: String,
    pub content: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl SendMessage {
    pub fn text(sender: &str, recipient: &str, content: &str) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            content: content.to_string(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }
}

/// PUT /messages/mark-read body
#[derive(Debug, Serialize)]
pub struct MarkRead {
    pub sender: String,
    pub recipient: String,
}

impl MarkRead {
    pub fn new(sender: &str, recipient: &str) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
        }
    }
}

/// POST /users/connect and /users/disconnect body
#[derive(Debug, Serialize)]
pub struct Presence {
    pub username: String,
}

impl Presence {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
        }
    }
}

/// Message as returned by the API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub id: String,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: String,
    pub read: bool,
    pub read_at: Option<String>,
    pub sender_online: bool,
}

#[derive(Debug, Deserialize)]
pub struct HistoryBody {
    pub username: String,
    pub messages: Vec<MessageBody>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ConversationBody {
    pub participants: Vec<String>,
    pub messages: Vec<MessageBody>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct MarkReadBody {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct OnlineUsersBody {
    pub users: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusBody {
    pub username: String,
    pub is_online: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdateBody {
    pub username: String,
    pub is_online: bool,
    pub status: String,
}

/// Message contents in response order
pub fn contents(messages: &[MessageBody]) -> Vec<&str> {
    messages.iter().map(|m| m.content.as_str()).collect()
}
