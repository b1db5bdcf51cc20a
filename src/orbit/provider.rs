use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::error::OrbitError;
use super::types::OrbitalState;
use crate::catalog::{Catalog, CatalogEntry};

/// Derives object positions from the catalog's current element sets.
///
/// `state_at` is a pure function of the catalog snapshot and the requested
/// instant: identical inputs always produce identical output.
#[derive(Clone)]
pub struct StateProvider {
    catalog: Arc<Catalog>,
}

impl StateProvider {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn state_at(
        &self,
        object_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<OrbitalState, OrbitError> {
        let snapshot = self
            .catalog
            .snapshot()
            .map_err(|e| OrbitError::Unavailable(e.to_string()))?;
        let entry = snapshot
            .get(object_id)
            .ok_or_else(|| OrbitError::ObjectNotFound(object_id.to_string()))?;
        state_of(entry, timestamp)
    }
}

pub fn state_of(entry: &CatalogEntry, timestamp: DateTime<Utc>) -> Result<OrbitalState, OrbitError> {
    entry
        .propagator
        .propagate(timestamp)
        .map_err(|message| OrbitError::Propagation {
            id: entry.object.id.clone(),
            message,
        })
}
