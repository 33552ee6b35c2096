//! Message service
//!
//! Sending, history and conversation queries, and read-marking.

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use parley_core::{Message, MessageKind};

use crate::dto::{
    ConversationResponse, HistoryResponse, MarkReadRequest, MarkReadResponse, MessageResponse,
    SendMessageRequest,
};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Persist a new unread message.
    ///
    /// `sender_online` is stored as informational metadata only.
    #[instrument(skip(self, request), fields(sender = %request.sender, recipient = %request.recipient))]
    pub async fn save_message(
        &self,
        request: SendMessageRequest,
        sender_online: bool,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;

        let message = Message::new(
            self.ctx.generate_id(),
            request.sender,
            request.recipient,
            request.content,
            MessageKind::parse_or_text(request.kind.as_deref()),
        )?
        .with_sender_online(sender_online);

        self.ctx.message_repo().create(&message).await?;

        info!(
            id = %message.id,
            kind = %message.kind,
            preview = message.preview(32),
            "Message saved"
        );
        Ok(MessageResponse::from(message))
    }

    /// Messages sent or received by `username`, newest first
    #[instrument(skip(self))]
    pub async fn get_history(
        &self,
        username: &str,
        limit: Option<i64>,
    ) -> ServiceResult<HistoryResponse> {
        let limit = self.ctx.limits().resolve(limit);
        let messages: Vec<MessageResponse> = self
            .ctx
            .message_repo()
            .find_by_participant(username, limit)
            .await?
            .into_iter()
            .map(MessageResponse::from)
            .collect();

        Ok(HistoryResponse {
            username: username.to_string(),
            count: messages.len(),
            messages,
        })
    }

    /// Messages between two users in both directions, newest first.
    /// Symmetric in `user_a` and `user_b`.
    #[instrument(skip(self))]
    pub async fn get_conversation(
        &self,
        user_a: &str,
        user_b: &str,
        limit: Option<i64>,
    ) -> ServiceResult<ConversationResponse> {
        let limit = self.ctx.limits().resolve(limit);
        let messages: Vec<MessageResponse> = self
            .ctx
            .message_repo()
            .find_conversation(user_a, user_b, limit)
            .await?
            .into_iter()
            .map(MessageResponse::from)
            .collect();

        Ok(ConversationResponse {
            participants: [user_a.to_string(), user_b.to_string()],
            count: messages.len(),
            messages,
        })
    }

    /// Mark unread messages from `sender` to `recipient` as read.
    /// The reverse direction is untouched.
    #[instrument(skip(self, request), fields(sender = %request.sender, recipient = %request.recipient))]
    pub async fn mark_as_read(&self, request: MarkReadRequest) -> ServiceResult<MarkReadResponse> {
        request.validate()?;

        let count = self
            .ctx
            .message_repo()
            .mark_read(&request.sender, &request.recipient, Utc::now())
            .await?;

        info!(count, "Messages marked as read");
        Ok(MarkReadResponse { count })
    }
}
