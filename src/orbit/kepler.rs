use chrono::{DateTime, Utc};
use std::f64::consts::TAU;

use super::elements::KeplerElements;
use super::types::{
    normalize_longitude, semi_major_axis_km, OrbitalState, EARTH_MU_KM3_S2, EARTH_RADIUS_KM,
    EARTH_ROTATION_RAD_S,
};

const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: usize = 50;

/// Two-body propagation with the ascending node expressed in Earth-fixed longitude.
pub fn propagate(k: &KeplerElements, timestamp: DateTime<Utc>) -> OrbitalState {
    let dt = (timestamp - k.epoch).num_milliseconds() as f64 / 1000.0;
    let a = semi_major_axis_km(k.period_minutes);
    let n = TAU / (k.period_minutes * 60.0);
    let e = k.eccentricity;

    let mean_anomaly = (k.mean_anomaly_deg.to_radians() + n * dt).rem_euclid(TAU);
    let ecc_anomaly = solve_kepler(mean_anomaly, e);
    let true_anomaly = 2.0
        * ((1.0 + e).sqrt() * (ecc_anomaly / 2.0).sin())
            .atan2((1.0 - e).sqrt() * (ecc_anomaly / 2.0).cos());
    let radius = a * (1.0 - e * ecc_anomaly.cos());

    let inclination = k.inclination_deg.to_radians();
    let arg_latitude = k.argument_of_perigee_deg.to_radians() + true_anomaly;

    let latitude = (inclination.sin() * arg_latitude.sin()).asin();
    let node_longitude = k.node_longitude_deg.to_radians() - EARTH_ROTATION_RAD_S * dt;
    let longitude =
        node_longitude + (inclination.cos() * arg_latitude.sin()).atan2(arg_latitude.cos());

    let speed_km_s = (EARTH_MU_KM3_S2 * (2.0 / radius - 1.0 / a)).sqrt();

    OrbitalState {
        timestamp,
        latitude: latitude.to_degrees(),
        longitude: normalize_longitude(longitude.to_degrees()),
        altitude_km: radius - EARTH_RADIUS_KM,
        velocity_kmh: speed_km_s * 3600.0,
    }
}

/// Newton iteration on M = E - e sin E.
fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = if e > 0.8 { std::f64::consts::PI } else { mean_anomaly };
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let f = ecc - e * ecc.sin() - mean_anomaly;
        if f.abs() < KEPLER_TOLERANCE {
            break;
        }
        ecc -= f / (1.0 - e * ecc.cos());
    }
    ecc
}
