//! Message entity <-> model mapper

use parley_core::{Message, MessageKind, Snowflake};

use crate::models::MessageModel;

impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        Message {
            id: Snowflake::new(model.id),
            sender: model.sender,
            recipient: model.recipient,
            content: model.content,
            kind: MessageKind::parse_or_text(Some(&model.message_type)),
            created_at: model.created_at,
            read: model.is_read,
            read_at: model.read_at,
            sender_online: model.sender_online,
        }
    }
}
