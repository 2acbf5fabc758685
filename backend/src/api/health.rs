//! Health check endpoint

use super::subscriptions::ServiceState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Crate version
    pub version: String,
    /// "ok" when storage answers a ping, "unavailable" otherwise
    pub database: String,
}

/// GET /health - Liveness plus a storage ping (HEAD is answered too)
pub async fn health_check(
    State(service): State<ServiceState>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status, health, database) = match service.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "ok"),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", "unavailable")
        }
    };

    (
        status,
        Json(HealthResponse {
            status: health.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: database.to_string(),
        }),
    )
}
