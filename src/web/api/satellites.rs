use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::catalog::{ObjectSummary, OrbitalObject};
use crate::orbit::OrbitalState;
use crate::visibility::{ObservationPoint, Pass, VisibleSatellite};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OverheadQuery {
    /// Observer latitude in degrees
    pub lat: f64,
    /// Observer longitude in degrees
    pub lng: f64,
    /// Observer altitude above sea level in meters
    #[serde(default)]
    pub alt_m: Option<f64>,
    /// Narrows the visibility range (km); cannot widen it
    #[serde(default)]
    pub radius: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OverheadResponse {
    pub satellites: Vec<VisibleSatellite>,
    pub count: usize,
    pub timestamp: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/satellites",
    tag = "satellites",
    params(OverheadQuery),
    responses(
        (status = 200, description = "Objects currently visible, most overhead first", body = OverheadResponse),
        (status = 400, description = "Invalid coordinates", body = ErrorResponse),
        (status = 503, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn overhead(
    State(state): State<AppState>,
    query: Result<Query<OverheadQuery>, QueryRejection>,
) -> ApiResult<Json<OverheadResponse>> {
    let Query(query) = query?;
    let now = Utc::now();
    let observation = ObservationPoint::new(query.lat, query.lng, query.alt_m, now)?;

    let satellites = state.engine.overhead(&observation, query.radius)?;
    Ok(Json(OverheadResponse {
        count: satellites.len(),
        satellites,
        timestamp: now,
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the object name or identifier
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub results: Vec<ObjectSummary>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/api/satellites/search",
    tag = "satellites",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching objects ordered by identifier", body = SearchResponse),
        (status = 400, description = "Missing query", body = ErrorResponse),
        (status = 503, description = "Catalog unavailable", body = ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Query(query) = query?;
    let results: Vec<ObjectSummary> = state
        .engine
        .search(&query.query)?
        .iter()
        .map(ObjectSummary::from)
        .collect();

    Ok(Json(SearchResponse {
        count: results.len(),
        results,
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetailQuery {
    /// Observer latitude for pass prediction; defaults to the station
    #[serde(default)]
    pub lat: Option<f64>,
    /// Observer longitude for pass prediction; defaults to the station
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default)]
    pub alt_m: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SatelliteDetail {
    pub satellite: OrbitalObject,
    pub position: OrbitalState,
    pub observer: ObservationPoint,
    pub next_passes: Vec<Pass>,
}

#[utoipa::path(
    get,
    path = "/api/satellites/{id}",
    tag = "satellites",
    params(
        ("id" = String, Path, description = "Object identifier"),
        DetailQuery
    ),
    responses(
        (status = 200, description = "Object metadata, current position and upcoming passes", body = SatelliteDetail),
        (status = 400, description = "Invalid observer", body = ErrorResponse),
        (status = 404, description = "Unknown object", body = ErrorResponse),
        (status = 503, description = "Catalog or propagation unavailable", body = ErrorResponse)
    )
)]
pub async fn detail(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    query: Result<Query<DetailQuery>, QueryRejection>,
) -> ApiResult<Json<SatelliteDetail>> {
    let Path(id) = id?;
    let Query(query) = query?;
    let now = Utc::now();

    let observer = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => ObservationPoint::new(lat, lng, query.alt_m, now)?,
        (None, None) => state.station.at(now),
        _ => {
            return Err(ApiError::invalid_input(
                "lat and lng must be given together",
            ))
        }
    };

    let satellite = state.engine.find_by_id(&id)?;
    let position = state.engine.state_at(&id, now)?;
    let next_passes = state.engine.next_passes(&id, &observer)?;

    Ok(Json(SatelliteDetail {
        satellite,
        position,
        observer,
        next_passes,
    }))
}
