//! Fixtures shared by unit tests.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

use crate::catalog::{entry_from_record, CatalogRecord, CatalogSnapshot, ObjectCategory};
use crate::orbit::{normalize_longitude, KeplerElements, OrbitalElements};

pub const ISS_LINE1: &str = "1 25544U 98067A   24001.50000000  .00016717  00000-0  10270-3 0  9009";
pub const ISS_LINE2: &str = "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.49815713431269";
pub const HST_LINE1: &str = "1 20580U 90037B   24001.50000000  .00001077  00000-0  51498-4 0  9992";
pub const HST_LINE2: &str = "2 20580  28.4697 106.4571 0002569  78.3318 281.7800 15.28070984612345";

pub fn iss_record() -> CatalogRecord {
    CatalogRecord {
        id: "25544".into(),
        name: "ISS (ZARYA)".into(),
        category: ObjectCategory::HumanSpaceflight,
        launch_date: NaiveDate::from_ymd_opt(1998, 11, 20),
        operator: Some("NASA/Roscosmos".into()),
        elements: OrbitalElements::Tle {
            line1: ISS_LINE1.into(),
            line2: ISS_LINE2.into(),
        },
    }
}

pub fn hubble_record() -> CatalogRecord {
    CatalogRecord {
        id: "20580".into(),
        name: "HST".into(),
        category: ObjectCategory::Scientific,
        launch_date: NaiveDate::from_ymd_opt(1990, 4, 24),
        operator: Some("NASA".into()),
        elements: OrbitalElements::Tle {
            line1: HST_LINE1.into(),
            line2: HST_LINE2.into(),
        },
    }
}

/// Circular ~420 km orbit whose sub-satellite point is (`lat`, `lon`) at `at`.
pub fn overhead_record(id: &str, lat: f64, lon: f64, at: DateTime<Utc>) -> CatalogRecord {
    let (argument_of_perigee_deg, node_longitude_deg) = if lat >= 0.0 {
        (90.0, normalize_longitude(lon - 90.0))
    } else {
        (270.0, normalize_longitude(lon + 90.0))
    };
    CatalogRecord {
        id: id.into(),
        name: format!("Test object {id}"),
        category: ObjectCategory::Unknown,
        launch_date: None,
        operator: None,
        elements: OrbitalElements::Kepler(KeplerElements {
            epoch: at,
            inclination_deg: lat.abs(),
            period_minutes: 92.7,
            eccentricity: 0.0,
            node_longitude_deg,
            argument_of_perigee_deg,
            mean_anomaly_deg: 0.0,
        }),
    }
}

pub fn snapshot_of(records: Vec<CatalogRecord>) -> CatalogSnapshot {
    let entries: BTreeMap<_, _> = records
        .into_iter()
        .map(|r| {
            let entry = entry_from_record(r).expect("fixture record compiles");
            (entry.object.id.clone(), entry)
        })
        .collect();
    CatalogSnapshot::new(entries)
}
