use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use super::types::{normalize_longitude, OrbitalState, EARTH_RADIUS_KM};

pub fn sgp4_state(
    elements: &Elements,
    constants: &Constants,
    timestamp: DateTime<Utc>,
) -> Result<OrbitalState, String> {
    let minutes = elements
        .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
        .map_err(|e| e.to_string())?;

    let prediction = constants.propagate(minutes).map_err(|e| e.to_string())?;

    let sidereal =
        sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()));

    let ecef = teme_to_ecef_position(prediction.position, sidereal);
    let horizontal = (ecef[0] * ecef[0] + ecef[1] * ecef[1]).sqrt();
    let radius = (horizontal * horizontal + ecef[2] * ecef[2]).sqrt();

    let v = prediction.velocity;
    let speed_km_s = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();

    Ok(OrbitalState {
        timestamp,
        latitude: ecef[2].atan2(horizontal).to_degrees(),
        longitude: normalize_longitude(ecef[1].atan2(ecef[0]).to_degrees()),
        altitude_km: radius - EARTH_RADIUS_KM,
        velocity_kmh: speed_km_s * 3600.0,
    })
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}
