//! Entity to DTO mappers

use parley_core::Message;

use super::responses::MessageResponse;

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            kind: message.kind.to_string(),
            created_at: message.created_at,
            read: message.read,
            read_at: message.read_at,
            sender_online: message.sender_online,
            sender: message.sender,
            recipient: message.recipient,
            content: message.content,
        }
    }
}
