//! Health check handler

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use utoipa::ToSchema;

use super::super::state::AppState;
use super::super::types::ApiResponse;

/// Health check response data
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    #[schema(example = 1733200000000_i64)]
    pub timestamp_ms: i64,
    /// Git revision the binary was built from
    #[schema(example = "3f2c1ab")]
    pub build: &'static str,
}

/// Health check endpoint
///
/// Pings PostgreSQL. Internal details never reach the response body.
///
/// - Healthy: 200 OK
/// - Unhealthy: 503 Service Unavailable
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json"),
        (status = 503, description = "Service unavailable")
    ),
    tag = "System"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let healthy = match state.db.as_ref() {
        Some(db) => match db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("[HEALTH] PostgreSQL ping failed: {}", e);
                false
            }
        },
        None => {
            tracing::error!("[HEALTH] No database configured");
            false
        }
    };

    if healthy {
        (
            StatusCode::OK,
            Json(ApiResponse::success(
                "ok",
                HealthResponse {
                    timestamp_ms: Utc::now().timestamp_millis(),
                    build: env!("GIT_HASH"),
                },
            )),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                status: "error",
                message: "unavailable".to_string(),
                data: None,
            }),
        )
    }
}
