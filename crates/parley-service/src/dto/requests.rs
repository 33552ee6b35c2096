//! Request DTOs for API endpoints
//!
//! Missing fields deserialize as empty strings so that validation, not JSON
//! parsing, reports them.

use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

/// Flatten field errors into one client-facing sentence, ordered by field name
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));
    let messages: Vec<String> = fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
            })
        })
        .collect();
    if messages.is_empty() {
        "invalid request".to_string()
    } else {
        messages.join("; ")
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Send message request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SendMessageRequest {
    #[validate(custom(function = "not_blank", message = "sender is required"))]
    pub sender: String,

    #[validate(custom(function = "not_blank", message = "recipient is required"))]
    pub recipient: String,

    #[validate(custom(function = "not_blank", message = "content is required"))]
    pub content: String,

    /// Message kind; absent or blank means text
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Mark messages from `sender` to `recipient` as read
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct MarkReadRequest {
    #[validate(custom(function = "not_blank", message = "sender is required"))]
    pub sender: String,

    #[validate(custom(function = "not_blank", message = "recipient is required"))]
    pub recipient: String,
}

/// Connect / disconnect request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PresenceRequest {
    #[validate(custom(function = "not_blank", message = "username is required"))]
    pub username: String,
}
