use chrono::Utc;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::orbit::StateProvider;
use crate::shield::{Clock, ShieldManager};
use crate::visibility::{ObservationPoint, VisibilityEngine, VisibilityError};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<VisibilityEngine>,
    pub shields: Arc<ShieldManager>,
    /// Default observer for pass predictions. Its timestamp is replaced per request.
    pub station: ObservationPoint,
}

impl AppState {
    pub fn new(
        config: &Config,
        catalog: Arc<Catalog>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, VisibilityError> {
        let station = ObservationPoint::from_coordinates(
            &config.station.coordinates,
            Some(config.station.altitude_m),
            Utc::now(),
        )?;
        let engine = VisibilityEngine::new(StateProvider::new(catalog), config.visibility.clone());
        let shields = ShieldManager::new(config.shields.tiers.clone(), clock)
            .with_retention(config.shields.retention);

        Ok(Self {
            engine: Arc::new(engine),
            shields: Arc::new(shields),
            station,
        })
    }
}
