use crate::dtos::health::HealthResponse;
use axum::Json;

/// Reports that the service is up
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
