use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::response::success_response;
use common::types::Welcome;
use serde_json::json;

use crate::state::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to the Booking and Store Service API";

/// Raw health body, not enveloped. A failed probe answers 503 with the
/// report under `detail`.
#[utoipa::path(
    get, path = "/health", tag = "health",
    responses(
        (status = 200, description = "API and database reachable", body = crate::openapi::HealthResponse),
        (status = 503, description = "Database unreachable")
    )
)]
pub async fn health(State(state): State<AppState>) -> Response {
    let report = service::health::check(state.enterprises.enterprises()).await;
    if report.is_healthy() {
        (StatusCode::OK, Json(report)).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "detail": report }))).into_response()
    }
}

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Welcome", body = crate::openapi::EnvelopeDoc)))]
pub async fn root() -> Response {
    success_response(Some(Welcome { message: WELCOME_MESSAGE.to_string() }))
}
