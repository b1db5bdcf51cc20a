//! Spherical-earth look geometry between an observer and a sub-satellite point.

use crate::orbit::{OrbitalState, EARTH_RADIUS_KM};

use super::observation::ObservationPoint;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAngles {
    pub ground_distance_km: f64,
    pub elevation_deg: f64,
    pub azimuth_deg: f64,
}

/// Great-circle central angle in radians (haversine).
pub fn central_angle(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let (lat1, lat2) = (lat1_deg.to_radians(), lat2_deg.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (lon2_deg - lon1_deg).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

pub fn ground_distance_km(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    EARTH_RADIUS_KM * central_angle(lat1_deg, lon1_deg, lat2_deg, lon2_deg)
}

/// Elevation of a point at `target_alt_km` above a spot `angle` radians away.
pub fn elevation_deg(angle: f64, observer_alt_km: f64, target_alt_km: f64) -> f64 {
    let ratio = (EARTH_RADIUS_KM + observer_alt_km) / (EARTH_RADIUS_KM + target_alt_km);
    (angle.cos() - ratio).atan2(angle.sin()).to_degrees()
}

/// Initial great-circle bearing, degrees clockwise from north.
pub fn azimuth_deg(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let (lat1, lat2) = (lat1_deg.to_radians(), lat2_deg.to_radians());
    let dlon = (lon2_deg - lon1_deg).to_radians();
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

pub fn look_angles(observer: &ObservationPoint, state: &OrbitalState) -> LookAngles {
    let angle = central_angle(
        observer.latitude,
        observer.longitude,
        state.latitude,
        state.longitude,
    );
    LookAngles {
        ground_distance_km: EARTH_RADIUS_KM * angle,
        elevation_deg: elevation_deg(angle, observer.altitude_km(), state.altitude_km),
        azimuth_deg: azimuth_deg(
            observer.latitude,
            observer.longitude,
            state.latitude,
            state.longitude,
        ),
    }
}
