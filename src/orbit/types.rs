use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const EARTH_RADIUS_KM: f64 = 6371.0088;
pub const EARTH_MU_KM3_S2: f64 = 398_600.4418;
pub const EARTH_ROTATION_RAD_S: f64 = 7.292_115e-5;

/// Ground-projected state of an object at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct OrbitalState {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude_km: f64,
    pub velocity_kmh: f64,
}

/// Classical orbit parameters derived from whichever element form an object carries.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrbitSummary {
    pub epoch: DateTime<Utc>,
    pub inclination_deg: f64,
    pub period_minutes: f64,
    pub eccentricity: f64,
    pub perigee_altitude_km: f64,
    pub apogee_altitude_km: f64,
}

impl OrbitSummary {
    pub fn from_mean_motion(
        epoch: DateTime<Utc>,
        inclination_deg: f64,
        period_minutes: f64,
        eccentricity: f64,
    ) -> Self {
        let a = semi_major_axis_km(period_minutes);
        Self {
            epoch,
            inclination_deg,
            period_minutes,
            eccentricity,
            perigee_altitude_km: a * (1.0 - eccentricity) - EARTH_RADIUS_KM,
            apogee_altitude_km: a * (1.0 + eccentricity) - EARTH_RADIUS_KM,
        }
    }
}

/// Semi-major axis from Kepler's third law.
pub fn semi_major_axis_km(period_minutes: f64) -> f64 {
    let n = std::f64::consts::TAU / (period_minutes * 60.0);
    (EARTH_MU_KM3_S2 / (n * n)).cbrt()
}

/// Wraps a longitude in degrees into [-180, 180).
pub fn normalize_longitude(lon_deg: f64) -> f64 {
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iss_like_period_gives_low_earth_orbit() {
        let a = semi_major_axis_km(92.68);
        let altitude = a - EARTH_RADIUS_KM;
        assert!((400.0..440.0).contains(&altitude), "altitude {altitude}");
    }

    #[test]
    fn longitude_wraps() {
        assert!((normalize_longitude(190.0) - -170.0).abs() < 1e-9);
        assert!((normalize_longitude(-212.5) - 147.5).abs() < 1e-9);
        assert!((normalize_longitude(45.0) - 45.0).abs() < 1e-9);
    }
}
