//! Response DTOs for API endpoints
//!
//! Field names are camelCase on the wire. Snowflake ids are serialized as
//! strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use serde::Serialize;

use parley_core::{PresenceCapability, PresenceOutcome, Snowflake};

// ============================================================================
// Envelope
// ============================================================================

/// Envelope around every API response: `{success, data?, error?}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

// ============================================================================
// Message Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: Snowflake,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub sender_online: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub username: String,
    pub messages: Vec<MessageResponse>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationResponse {
    pub participants: [String; 2],
    pub messages: Vec<MessageResponse>,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MarkReadResponse {
    pub count: u64,
}

// ============================================================================
// Presence Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OnlineUsersResponse {
    pub users: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusResponse {
    pub username: String,
    pub is_online: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUpdateResponse {
    pub username: String,
    pub is_online: bool,
    pub status: &'static str,
}

impl PresenceUpdateResponse {
    pub fn new(username: impl Into<String>, is_online: bool, outcome: PresenceOutcome) -> Self {
        Self {
            username: username.into(),
            is_online,
            status: outcome.as_str(),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessChecks {
    pub message_store: String,
    pub account_store: String,
    pub presence_schema: String,
}

impl ReadinessResponse {
    /// Ready when both stores answer. Degraded presence is reported but
    /// does not make the service unready.
    pub fn ready(
        message_store_healthy: bool,
        account_store_healthy: bool,
        presence: PresenceCapability,
    ) -> Self {
        let health = |ok: bool| if ok { "healthy" } else { "unhealthy" }.to_string();
        Self {
            status: if message_store_healthy && account_store_healthy {
                "ready"
            } else {
                "not_ready"
            }
            .to_string(),
            timestamp: Utc::now(),
            checks: ReadinessChecks {
                message_store: health(message_store_healthy),
                account_store: health(account_store_healthy),
                presence_schema: match presence {
                    PresenceCapability::Full => "full",
                    PresenceCapability::Degraded => "degraded",
                }
                .to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

/// Service index returned from `/`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfoResponse {
    pub name: String,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}
