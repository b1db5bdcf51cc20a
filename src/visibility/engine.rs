use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::catalog::{Catalog, OrbitalObject};
use crate::config::VisibilityConfig;
use crate::orbit::{state_of, OrbitError, OrbitalState, StateProvider};

use super::error::VisibilityError;
use super::geometry::{look_angles, LookAngles};
use super::observation::ObservationPoint;
use super::pass_finder::{predict_passes, round2};
use super::types::{Pass, VisibleSatellite};

/// Physical visibility rule shared by overhead queries and pass prediction.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityCriteria {
    pub min_elevation_deg: f64,
    pub max_ground_distance_km: f64,
}

impl VisibilityCriteria {
    pub fn admits(&self, look: &LookAngles) -> bool {
        look.elevation_deg > self.min_elevation_deg
            && look.ground_distance_km <= self.max_ground_distance_km
    }
}

pub struct VisibilityEngine {
    provider: StateProvider,
    config: VisibilityConfig,
}

impl VisibilityEngine {
    pub fn new(provider: StateProvider, config: VisibilityConfig) -> Self {
        Self { provider, config }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.provider.catalog()
    }

    pub fn criteria(&self) -> VisibilityCriteria {
        VisibilityCriteria {
            min_elevation_deg: self.config.min_elevation_deg,
            max_ground_distance_km: self.config.max_ground_distance_km,
        }
    }

    /// Objects visible from `observation`, most overhead first.
    ///
    /// `radius_km` can only narrow the service-wide visibility range.
    pub fn overhead(
        &self,
        observation: &ObservationPoint,
        radius_km: Option<f64>,
    ) -> Result<Vec<VisibleSatellite>, VisibilityError> {
        let observation = ObservationPoint::new(
            observation.latitude,
            observation.longitude,
            Some(observation.altitude_m),
            observation.timestamp,
        )?;

        let mut criteria = self.criteria();
        if let Some(radius) = radius_km {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(VisibilityError::InvalidRadius(radius));
            }
            criteria.max_ground_distance_km = criteria.max_ground_distance_km.min(radius);
        }

        let snapshot = self.provider.catalog().snapshot()?;
        let mut hits = Vec::new();

        for entry in snapshot.entries() {
            let state = match state_of(entry, observation.timestamp) {
                Ok(state) => state,
                Err(e) => {
                    log::warn!("Skipping {} in overhead query: {}", entry.object.id, e);
                    continue;
                }
            };

            let look = look_angles(&observation, &state);
            if criteria.admits(&look) {
                hits.push((entry, state, look));
            }
        }

        // order on exact elevations, rounding is only for display
        hits.sort_by(|(a, _, a_look), (b, _, b_look)| {
            b_look
                .elevation_deg
                .total_cmp(&a_look.elevation_deg)
                .then_with(|| a.object.id.cmp(&b.object.id))
        });

        let visible = hits
            .into_iter()
            .map(|(entry, state, look)| VisibleSatellite {
                id: entry.object.id.clone(),
                name: entry.object.name.clone(),
                latitude: round2(state.latitude),
                longitude: round2(state.longitude),
                altitude_km: round2(state.altitude_km),
                velocity_kmh: round2(state.velocity_kmh),
                visible: true,
                elevation_deg: round2(look.elevation_deg),
                azimuth_deg: round2(look.azimuth_deg),
                ground_distance_km: round2(look.ground_distance_km),
            })
            .collect();

        Ok(visible)
    }

    pub fn find_by_id(&self, object_id: &str) -> Result<OrbitalObject, VisibilityError> {
        Ok(self.provider.catalog().find(object_id)?)
    }

    pub fn search(&self, query: &str) -> Result<Vec<OrbitalObject>, VisibilityError> {
        Ok(self.provider.catalog().search(query)?)
    }

    pub fn state_at(
        &self,
        object_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<OrbitalState, VisibilityError> {
        Ok(self.provider.state_at(object_id, timestamp)?)
    }

    /// Upcoming passes over `observer`, starting at its timestamp.
    pub fn next_passes(
        &self,
        object_id: &str,
        observer: &ObservationPoint,
    ) -> Result<Vec<Pass>, VisibilityError> {
        let snapshot = self.provider.catalog().snapshot()?;
        let entry = snapshot
            .get(object_id)
            .ok_or_else(|| OrbitError::ObjectNotFound(object_id.to_string()))?;

        let window = Duration::from_std(self.config.pass_window)
            .map_err(|e| VisibilityError::InvalidObservation(e.to_string()))?;

        Ok(predict_passes(
            entry,
            observer,
            &self.criteria(),
            observer.timestamp,
            observer.timestamp + window,
            self.config.max_passes,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::{hubble_record, iss_record, overhead_record, snapshot_of};
    use chrono::TimeZone;

    fn engine_with(records: Vec<crate::catalog::CatalogRecord>) -> VisibilityEngine {
        let catalog = Arc::new(Catalog::with_snapshot(snapshot_of(records)));
        VisibilityEngine::new(StateProvider::new(catalog), VisibilityConfig::default())
    }

    fn query_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 4, 18, 30, 0).unwrap()
    }

    #[test]
    fn object_directly_overhead_comes_first() {
        let t = query_time();
        let engine = engine_with(vec![
            overhead_record("zenith", 37.7749, -122.4194, t),
            // sub-satellite point ~500 km away
            overhead_record("nearby", 41.5, -120.0, t),
            // far side of the planet
            overhead_record("antipode", -37.7749, 57.5806, t),
            iss_record(),
        ]);
        let observer = ObservationPoint::new(37.7749, -122.4194, None, t).unwrap();

        let result = engine.overhead(&observer, None).unwrap();

        assert_eq!(result[0].id, "zenith");
        assert!(result[0].elevation_deg > 89.9);
        assert!(result[0].visible);
        assert!(result.iter().any(|s| s.id == "nearby"));
        assert!(result.iter().all(|s| s.id != "antipode"));
    }

    #[test]
    fn results_sorted_and_above_threshold() {
        let t = query_time();
        let mut records = vec![iss_record(), hubble_record()];
        for (i, (lat, lon)) in [(1.0, 1.0), (3.0, -2.0), (-4.0, 5.0), (8.0, 8.0), (0.5, -9.0)]
            .into_iter()
            .enumerate()
        {
            records.push(overhead_record(&format!("obj-{i}"), lat, lon, t));
        }
        let engine = engine_with(records);
        let observer = ObservationPoint::new(0.0, 0.0, None, t).unwrap();

        let result = engine.overhead(&observer, None).unwrap();
        assert!(result.len() >= 5);
        for pair in result.windows(2) {
            assert!(pair[0].elevation_deg >= pair[1].elevation_deg);
        }
        assert!(result.iter().all(|s| s.elevation_deg > 0.0));
    }

    #[test]
    fn ties_broken_by_identifier() {
        let t = query_time();
        let engine = engine_with(vec![
            overhead_record("b", 20.0, 30.0, t),
            overhead_record("a", 20.0, 30.0, t),
        ]);
        let observer = ObservationPoint::new(20.0, 30.0, None, t).unwrap();
        let ids: Vec<_> = engine
            .overhead(&observer, None)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn near_equal_elevations_keep_true_order() {
        let t = query_time();
        // ~30 m apart, elevations differ by a few thousandths of a degree
        let engine = engine_with(vec![
            overhead_record("z-near", 0.0, 5.0, t),
            overhead_record("a-far", 0.0, 5.0003, t),
        ]);
        let observer = ObservationPoint::new(0.0, 0.0, None, t).unwrap();

        let result = engine.overhead(&observer, None).unwrap();
        let ids: Vec<_> = result.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["z-near", "a-far"]);
        assert!(result[0].elevation_deg >= result[1].elevation_deg);
    }

    #[test]
    fn min_elevation_is_respected() {
        let t = query_time();
        let catalog = Arc::new(Catalog::with_snapshot(snapshot_of(vec![
            overhead_record("zenith", 0.0, 0.0, t),
            overhead_record("low", 0.0, 15.0, t),
        ])));
        let config = VisibilityConfig {
            min_elevation_deg: 30.0,
            ..VisibilityConfig::default()
        };
        let engine = VisibilityEngine::new(StateProvider::new(catalog), config);
        let observer = ObservationPoint::new(0.0, 0.0, None, t).unwrap();

        let result = engine.overhead(&observer, None).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "zenith");
    }

    #[test]
    fn requested_radius_only_narrows() {
        let t = query_time();
        let engine = engine_with(vec![
            overhead_record("zenith", 0.0, 0.0, t),
            // ~555 km east along the equator
            overhead_record("east", 0.0, 5.0, t),
        ]);
        let observer = ObservationPoint::new(0.0, 0.0, None, t).unwrap();

        assert_eq!(engine.overhead(&observer, Some(100.0)).unwrap().len(), 1);
        assert_eq!(engine.overhead(&observer, Some(1_000_000.0)).unwrap().len(), 2);
        assert!(matches!(
            engine.overhead(&observer, Some(-1.0)),
            Err(VisibilityError::InvalidRadius(_))
        ));
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let t = query_time();
        let engine = engine_with(vec![overhead_record("far", -60.0, 120.0, t)]);
        let observer = ObservationPoint::new(60.0, -60.0, None, t).unwrap();
        assert!(engine.overhead(&observer, None).unwrap().is_empty());
    }

    #[test]
    fn invalid_observation_is_rejected() {
        let engine = engine_with(vec![]);
        let bad = ObservationPoint {
            latitude: 95.0,
            longitude: 0.0,
            altitude_m: 0.0,
            timestamp: query_time(),
        };
        let err = engine.overhead(&bad, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn unloaded_catalog_is_unavailable() {
        let engine = VisibilityEngine::new(
            StateProvider::new(Arc::new(Catalog::new())),
            VisibilityConfig::default(),
        );
        let observer = ObservationPoint::new(0.0, 0.0, None, query_time()).unwrap();
        assert_eq!(
            engine.overhead(&observer, None).unwrap_err().kind(),
            ErrorKind::Unavailable
        );
    }

    #[test]
    fn next_passes_for_known_and_unknown_objects() {
        let t = query_time();
        let engine = engine_with(vec![overhead_record("zenith", 51.5, -0.12, t)]);
        let observer = ObservationPoint::new(51.5, -0.12, None, t - Duration::minutes(20)).unwrap();

        let passes = engine.next_passes("zenith", &observer).unwrap();
        assert!(!passes.is_empty());
        assert!(passes.len() <= VisibilityConfig::default().max_passes);
        assert!(passes[0].aos < t && t < passes[0].los);

        assert_eq!(
            engine.next_passes("missing", &observer).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn catalog_passthroughs() {
        let engine = engine_with(vec![iss_record(), hubble_record()]);
        assert_eq!(engine.find_by_id("20580").unwrap().name, "HST");
        assert_eq!(
            engine.find_by_id("1").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(engine.search("iss").unwrap().len(), 1);
        assert_eq!(engine.search("").unwrap_err().kind(), ErrorKind::InvalidInput);
    }
}
