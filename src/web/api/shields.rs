use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::config::parse_duration;
use crate::shield::{Shield, ShieldRequest, Tier};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::state::AppState;

const ANONYMOUS_OWNER: &str = "anonymous";

#[derive(Debug, Deserialize, ToSchema)]
pub struct ActivateShieldRequest {
    /// Owning client; defaults to "anonymous"
    #[serde(default, alias = "user_id")]
    pub owner: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng")]
    pub longitude: f64,
    /// Radius in km; defaults to the tier default
    #[serde(default)]
    pub radius: Option<f64>,
    /// Defaults to basic
    #[serde(default)]
    pub shield_type: Option<Tier>,
    /// Lifetime such as "30m" or "2h"; defaults to the tier duration
    #[serde(default)]
    pub duration: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/privacy-shield",
    tag = "privacy-shield",
    request_body = ActivateShieldRequest,
    responses(
        (status = 201, description = "Shield activated", body = Shield),
        (status = 400, description = "Invalid coordinates, radius or duration", body = ErrorResponse),
        (status = 409, description = "Tier limit exceeded or overlapping shield", body = ErrorResponse)
    )
)]
pub async fn activate(
    State(state): State<AppState>,
    body: Result<Json<ActivateShieldRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Shield>)> {
    let Json(body) = body?;
    let duration = body
        .duration
        .as_deref()
        .map(parse_duration)
        .transpose()
        .map_err(ApiError::invalid_input)?;

    let shield = state.shields.activate(ShieldRequest {
        owner: body.owner.unwrap_or_else(|| ANONYMOUS_OWNER.to_string()),
        latitude: body.latitude,
        longitude: body.longitude,
        radius_km: body.radius,
        tier: body.shield_type.unwrap_or(Tier::Basic),
        duration,
    })?;

    Ok((StatusCode::CREATED, Json(shield)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListShieldsQuery {
    /// Owning client; defaults to "anonymous"
    #[serde(default, alias = "user_id")]
    pub owner: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShieldListResponse {
    pub shields: Vec<Shield>,
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/api/privacy-shield",
    tag = "privacy-shield",
    params(ListShieldsQuery),
    responses(
        (status = 200, description = "Active shields of the owner", body = ShieldListResponse)
    )
)]
pub async fn list_active(
    State(state): State<AppState>,
    query: Result<Query<ListShieldsQuery>, QueryRejection>,
) -> ApiResult<Json<ShieldListResponse>> {
    let Query(query) = query?;
    let owner = query.owner.as_deref().unwrap_or(ANONYMOUS_OWNER);
    let shields = state.shields.list_active(owner);

    Ok(Json(ShieldListResponse {
        count: shields.len(),
        shields,
    }))
}

#[utoipa::path(
    get,
    path = "/api/privacy-shield/{id}",
    tag = "privacy-shield",
    params(("id" = Uuid, Path, description = "Shield identifier")),
    responses(
        (status = 200, description = "Shield in any status", body = Shield),
        (status = 404, description = "Unknown shield", body = ErrorResponse)
    )
)]
pub async fn get_shield(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Shield>> {
    let Path(id) = id?;
    Ok(Json(state.shields.get(id)?))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExtendShieldRequest {
    /// Additional lifetime such as "30m"
    pub duration: String,
}

#[utoipa::path(
    post,
    path = "/api/privacy-shield/{id}/extend",
    tag = "privacy-shield",
    params(("id" = Uuid, Path, description = "Shield identifier")),
    request_body = ExtendShieldRequest,
    responses(
        (status = 200, description = "Shield with the new expiration", body = Shield),
        (status = 400, description = "Invalid duration", body = ErrorResponse),
        (status = 404, description = "Unknown shield", body = ErrorResponse),
        (status = 409, description = "Shield not active or cap exceeded", body = ErrorResponse)
    )
)]
pub async fn extend(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ExtendShieldRequest>, JsonRejection>,
) -> ApiResult<Json<Shield>> {
    let Path(id) = id?;
    let Json(body) = body?;
    let additional = parse_duration(&body.duration).map_err(ApiError::invalid_input)?;
    Ok(Json(state.shields.extend(id, additional)?))
}

#[utoipa::path(
    post,
    path = "/api/privacy-shield/{id}/deactivate",
    tag = "privacy-shield",
    params(("id" = Uuid, Path, description = "Shield identifier")),
    responses(
        (status = 200, description = "Shield after deactivation; repeated calls are no-ops", body = Shield),
        (status = 404, description = "Unknown shield", body = ErrorResponse)
    )
)]
pub async fn deactivate(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Shield>> {
    let Path(id) = id?;
    Ok(Json(state.shields.deactivate(id)?))
}
