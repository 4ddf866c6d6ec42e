//! Liveness endpoint.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
  pub status: String,
}

#[utoipa::path(
  get,
  path = "/health",
  tag = "system",
  responses((status = 200, description = "Service is up", body = HealthStatus))
)]
/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
  Json(HealthStatus {
    status: "ok".to_string(),
  })
}
