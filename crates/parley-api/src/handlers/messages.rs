//! Message handlers
//!
//! Endpoints for the message store.

use axum::extract::State;
use parley_service::dto::{
    ConversationResponse, HistoryResponse, MarkReadRequest, MarkReadResponse, MessageResponse,
    SendMessageRequest,
};
use parley_service::{MessageService, PresenceService};

use crate::extractors::{ConversationPath, HistoryLimit, PathParams, UsernamePath, ValidatedJson};
use crate::response::{ApiJson, ApiResult};
use crate::state::AppState;

/// Messages sent or received by a user, newest first
///
/// GET /messages/history/:username
pub async fn get_history(
    State(state): State<AppState>,
    PathParams(path): PathParams<UsernamePath>,
    HistoryLimit(limit): HistoryLimit,
) -> ApiResult<ApiJson<HistoryResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.get_history(&path.username, limit).await?;
    Ok(ApiJson(response))
}

/// Messages between two users, newest first
///
/// GET /messages/conversation/:user1/:user2
pub async fn get_conversation(
    State(state): State<AppState>,
    PathParams(path): PathParams<ConversationPath>,
    HistoryLimit(limit): HistoryLimit,
) -> ApiResult<ApiJson<ConversationResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service
        .get_conversation(&path.user1, &path.user2, limit)
        .await?;
    Ok(ApiJson(response))
}

/// Send a message. Responds 200 with the stored message.
///
/// POST /messages/send
pub async fn send_message(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<ApiJson<MessageResponse>> {
    let ctx = state.service_context();
    let sender_online = PresenceService::new(ctx).is_online(&request.sender).await;
    let response = MessageService::new(ctx)
        .save_message(request, sender_online)
        .await?;
    Ok(ApiJson(response))
}

/// Mark messages from `sender` to `recipient` as read
///
/// PUT /messages/mark-read
pub async fn mark_read(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<MarkReadRequest>,
) -> ApiResult<ApiJson<MarkReadResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.mark_as_read(request).await?;
    Ok(ApiJson(response))
}
