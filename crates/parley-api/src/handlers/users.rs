//! Presence handlers

use axum::extract::State;
use parley_service::dto::{
    OnlineUsersResponse, PresenceRequest, PresenceUpdateResponse, UserStatusResponse,
};
use parley_service::PresenceService;

use crate::extractors::{PathParams, UsernamePath, ValidatedJson};
use crate::response::{ApiJson, ApiResult};
use crate::state::AppState;

/// GET /users/online
pub async fn list_online(State(state): State<AppState>) -> ApiResult<ApiJson<OnlineUsersResponse>> {
    let service = PresenceService::new(state.service_context());
    Ok(ApiJson(service.list_online_users().await?))
}

/// Online status of one user. Unknown users and store failures read as
/// offline.
///
/// GET /users/status/:username
pub async fn get_status(
    State(state): State<AppState>,
    PathParams(path): PathParams<UsernamePath>,
) -> ApiJson<UserStatusResponse> {
    let service = PresenceService::new(state.service_context());
    ApiJson(service.status(&path.username).await)
}

/// POST /users/connect
pub async fn connect(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PresenceRequest>,
) -> ApiResult<ApiJson<PresenceUpdateResponse>> {
    let service = PresenceService::new(state.service_context());
    Ok(ApiJson(service.connect(request).await?))
}

/// POST /users/disconnect
pub async fn disconnect(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PresenceRequest>,
) -> ApiResult<ApiJson<PresenceUpdateResponse>> {
    let service = PresenceService::new(state.service_context());
    Ok(ApiJson(service.disconnect(request).await?))
}
