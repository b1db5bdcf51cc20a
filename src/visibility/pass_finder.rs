use chrono::{DateTime, Duration, Utc};

use crate::catalog::CatalogEntry;
use crate::orbit::{state_of, OrbitError};

use super::engine::VisibilityCriteria;
use super::geometry::{look_angles, LookAngles};
use super::observation::ObservationPoint;
use super::types::Pass;

const COARSE_STEP_SECONDS: i64 = 60; // 1 minute for initial scan
const FINE_STEP_SECONDS: i64 = 1; // 1 second for refinement

/// Scans `[start, end]` for intervals where the object satisfies `criteria`.
pub fn predict_passes(
    entry: &CatalogEntry,
    observer: &ObservationPoint,
    criteria: &VisibilityCriteria,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_passes: usize,
) -> Result<Vec<Pass>, OrbitError> {
    let sample = |t: DateTime<Utc>| -> Result<(bool, LookAngles), OrbitError> {
        let state = state_of(entry, t)?;
        let look = look_angles(observer, &state);
        Ok((criteria.admits(&look), look))
    };
    let make_pass = |aos: DateTime<Utc>,
                     aos_az: f64,
                     los: DateTime<Utc>,
                     los_az: f64,
                     tca: DateTime<Utc>,
                     max_el: f64| Pass {
        satellite: entry.object.name.clone(),
        id: entry.object.id.clone(),
        aos,
        los,
        tca,
        max_elevation_deg: round2(max_el),
        aos_azimuth_deg: round2(aos_az),
        los_azimuth_deg: round2(los_az),
        duration_seconds: (los - aos).num_seconds(),
    };

    let mut passes = Vec::new();
    if max_passes == 0 || end <= start {
        return Ok(passes);
    }

    let coarse_step = Duration::seconds(COARSE_STEP_SECONDS);

    // A pass already in progress at `start` is reported from `start`.
    let (mut in_pass, first) = sample(start)?;
    let mut aos = start;
    let mut aos_az = first.azimuth_deg;
    let mut max_el = first.elevation_deg;
    let mut tca = start;

    let mut prev = start;
    let mut cursor = start + coarse_step;

    while cursor <= end && passes.len() < max_passes {
        let (visible, look) = sample(cursor)?;

        if visible && !in_pass {
            let (t, az) = refine_crossing(&sample, prev, cursor, true)?;
            aos = t;
            aos_az = az;
            max_el = look.elevation_deg;
            tca = cursor;
            in_pass = true;
        } else if visible {
            if look.elevation_deg > max_el {
                max_el = look.elevation_deg;
                tca = cursor;
            }
        } else if in_pass {
            let (los, los_az) = refine_crossing(&sample, prev, cursor, false)?;
            passes.push(make_pass(aos, aos_az, los, los_az, tca, max_el));
            in_pass = false;
        }

        prev = cursor;
        cursor += coarse_step;
    }

    // Pass still in progress at the end of the window
    if in_pass && passes.len() < max_passes {
        let (_, look) = sample(end)?;
        passes.push(make_pass(aos, aos_az, end, look.azimuth_deg, tca, max_el));
    }

    Ok(passes)
}

/// Binary search for the first instant on the far side of a visibility edge.
fn refine_crossing<F>(
    sample: &F,
    before: DateTime<Utc>,
    after: DateTime<Utc>,
    rising: bool,
) -> Result<(DateTime<Utc>, f64), OrbitError>
where
    F: Fn(DateTime<Utc>) -> Result<(bool, LookAngles), OrbitError>,
{
    let mut low = before;
    let mut high = after;

    while (high - low).num_seconds() > FINE_STEP_SECONDS {
        let mid = low + (high - low) / 2;
        let (visible, _) = sample(mid)?;
        if visible == rising {
            high = mid;
        } else {
            low = mid;
        }
    }

    let (_, look) = sample(high)?;
    Ok((high, look.azimuth_deg))
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
