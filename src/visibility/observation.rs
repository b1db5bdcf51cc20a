use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::error::VisibilityError;

/// Where and when a query is made from. Constructed per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct ObservationPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_m: f64,
    pub timestamp: DateTime<Utc>,
}

impl ObservationPoint {
    pub fn new(
        latitude: f64,
        longitude: f64,
        altitude_m: Option<f64>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, VisibilityError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(VisibilityError::InvalidObservation(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(VisibilityError::InvalidObservation(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        let altitude_m = altitude_m.unwrap_or(0.0);
        if !altitude_m.is_finite() {
            return Err(VisibilityError::InvalidObservation(
                "altitude must be finite".into(),
            ));
        }
        Ok(Self {
            latitude,
            longitude,
            altitude_m,
            timestamp,
        })
    }

    /// Parses a `"lat, lon"` pair as written in the station config.
    pub fn from_coordinates(
        coordinates: &str,
        altitude_m: Option<f64>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, VisibilityError> {
        let parts: Vec<_> = coordinates.split(',').map(|s| s.trim()).collect();
        if parts.len() != 2 {
            return Err(VisibilityError::InvalidObservation(format!(
                "expected \"lat, lon\", got {coordinates:?}"
            )));
        }
        let parse = |s: &str| {
            s.parse::<f64>()
                .map_err(|e| VisibilityError::InvalidObservation(format!("{s:?}: {e}")))
        };
        Self::new(parse(parts[0])?, parse(parts[1])?, altitude_m, timestamp)
    }

    pub fn at(&self, timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, ..*self }
    }

    pub fn altitude_km(&self) -> f64 {
        self.altitude_m / 1000.0
    }
}
