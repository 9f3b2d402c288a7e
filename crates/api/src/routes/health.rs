use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Observations database is reachable and intact", body = HealthStatus),
        (status = SERVICE_UNAVAILABLE, description = "Observations database failed its checks", body = HealthStatus)
    ))]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthStatus>) {
    match state.climate_db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok".to_string(),
            }),
        ),
        Err(e) => {
            error!("health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "unavailable".to_string(),
                }),
            )
        }
    }
}
