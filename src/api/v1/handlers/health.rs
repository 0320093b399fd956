/*
 * Responsibility
 * - GET /health (liveness; no auth, no store access)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")})),
    )
}
