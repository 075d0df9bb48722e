// handlers/public/health.rs - GET /api/health

use axum::{http::StatusCode, response::IntoResponse, extract::State, Json};
use chrono::Utc;
use serde_json::json;

use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET /api/health - liveness plus a storage round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();

    match state.repository().health_check().await {
        Ok(()) => ApiResponse::success(json!({
            "status": "ok",
            "timestamp": now,
            "database": "ok"
        }))
        .with_message("Server is running")
        .into_response(),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "Database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unavailable"
                    }
                })),
            )
                .into_response()
        }
    }
}
