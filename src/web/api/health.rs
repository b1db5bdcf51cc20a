use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::web::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Objects in the current catalog snapshot, absent until the first load succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_objects: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_loaded_at: Option<DateTime<Utc>>,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.engine.catalog().snapshot().ok();
    Json(HealthResponse {
        status: if snapshot.is_some() {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        timestamp: Utc::now(),
        catalog_objects: snapshot.as_ref().map(|s| s.len()),
        catalog_loaded_at: snapshot.as_ref().map(|s| s.loaded_at()),
    })
}
