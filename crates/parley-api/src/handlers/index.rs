//! Service index and route fallback

use axum::{extract::State, http::Uri};
use parley_service::dto::ServiceInfoResponse;

use crate::response::{ApiError, ApiJson};
use crate::state::AppState;

const ENDPOINTS: &[&str] = &[
    "GET /messages/history/:username?limit=N",
    "GET /messages/conversation/:user1/:user2?limit=N",
    "POST /messages/send",
    "PUT /messages/mark-read",
    "GET /users/online",
    "GET /users/status/:username",
    "POST /users/connect",
    "POST /users/disconnect",
    "GET /health",
    "GET /health/ready",
];

/// GET /
pub async fn service_info(State(state): State<AppState>) -> ApiJson<ServiceInfoResponse> {
    ApiJson(ServiceInfoResponse {
        name: state.config().app.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS.to_vec(),
    })
}

/// JSON 404 for unmatched routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}
