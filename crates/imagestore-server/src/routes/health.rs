//! Liveness check.

use axum::http::StatusCode;

/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}
