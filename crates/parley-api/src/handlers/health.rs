//! Health check handlers
//!
//! Endpoints for liveness and readiness probes.

use axum::{extract::State, http::StatusCode};
use parley_service::dto::{HealthResponse, ReadinessResponse};

use crate::response::ApiJson;
use crate::state::AppState;

/// Basic health check (liveness probe)
///
/// GET /health
pub async fn health_check() -> ApiJson<HealthResponse> {
    ApiJson(HealthResponse::healthy())
}

/// Readiness check with store health
///
/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, ApiJson<ReadinessResponse>) {
    let ctx = state.service_context();
    let (messages, accounts) =
        tokio::join!(ctx.message_repo().ping(), ctx.presence_repo().ping());

    let response = ReadinessResponse::ready(
        messages.is_ok(),
        accounts.is_ok(),
        ctx.presence_repo().capability(),
    );
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, ApiJson(response))
}
