//! Message entity - a direct message between two users

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Kind of payload a message carries.
///
/// Transports may define their own kinds; anything unrecognised is kept
/// verbatim in [`MessageKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    File,
    Audio,
    Video,
    System,
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::File => "file",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::System => "system",
            Self::Other(kind) => kind,
        }
    }

    /// Parse a kind, treating absent or blank input as [`MessageKind::Text`]
    pub fn parse_or_text(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Text,
            Some(kind) => kind.parse().unwrap_or_default(),
        }
    }
}

impl FromStr for MessageKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "text" => Self::Text,
            "image" => Self::Image,
            "file" => Self::File,
            "audio" => Self::Audio,
            "video" => Self::Video,
            "system" => Self::System,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message entity
///
/// Everything except the read state is fixed once the message is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub sender: String,
    pub recipient: String,
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub read_at: Option<DateTime<Utc>>,
    /// Sender's presence when the message was sent. Informational only.
    pub sender_online: bool,
}

impl Message {
    /// Build an unread message, validating the participants and content.
    ///
    /// `created_at` is taken from the id so that id order and time order agree.
    pub fn new(
        id: Snowflake,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        content: impl Into<String>,
        kind: MessageKind,
    ) -> Result<Self, DomainError> {
        let message = Self {
            id,
            sender: sender.into(),
            recipient: recipient.into(),
            content: content.into(),
            kind,
            created_at: id.created_at(),
            read: false,
            read_at: None,
            sender_online: false,
        };
        message.validate()?;
        Ok(message)
    }

    pub fn with_sender_online(mut self, online: bool) -> Self {
        self.sender_online = online;
        self
    }

    /// Sender, recipient and content must be non-blank. Content length is
    /// not limited.
    pub fn validate(&self) -> Result<(), DomainError> {
        for (field, value) in [
            ("sender", &self.sender),
            ("recipient", &self.recipient),
            ("content", &self.content),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::missing_field(field));
            }
        }
        Ok(())
    }

    /// True when `username` sent or received this message
    #[inline]
    pub fn involves(&self, username: &str) -> bool {
        self.sender == username || self.recipient == username
    }

    /// True when the message belongs to the conversation between `a` and `b`,
    /// in either direction
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        (self.sender == a && self.recipient == b) || (self.sender == b && self.recipient == a)
    }

    /// Flip the read flag. Returns false when the message was already read.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read {
            return false;
        }
        self.read = true;
        self.read_at = Some(at);
        true
    }

    /// Get a truncated preview of the message (for logs)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            return &self.content;
        }
        let mut end = max_len;
        while end > 0 && !self.content.is_char_boundary(end) {
            end -= 1;
        }
        &self.content[..end]
    }
}
