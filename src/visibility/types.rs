use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// An object as seen from one observer at one instant.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VisibleSatellite {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "altitude")]
    pub altitude_km: f64,
    #[serde(rename = "velocity")]
    pub velocity_kmh: f64,
    pub visible: bool,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
    #[serde(rename = "distance_from_query")]
    pub ground_distance_km: f64,
}

/// A predicted visible pass
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pass {
    pub satellite: String,
    pub id: String,
    pub aos: DateTime<Utc>,
    pub los: DateTime<Utc>,
    pub tca: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub aos_azimuth_deg: f64,
    pub los_azimuth_deg: f64,
    pub duration_seconds: i64,
}
