use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::error::CatalogError;
use crate::catalog::types::OrbitalObject;
use crate::orbit::Propagator;

pub struct CatalogEntry {
    pub object: OrbitalObject,
    pub propagator: Propagator,
}

/// Immutable view of the catalog, keyed and ordered by identifier.
pub struct CatalogSnapshot {
    entries: BTreeMap<String, CatalogEntry>,
    loaded_at: DateTime<Utc>,
}

impl CatalogSnapshot {
    pub fn new(entries: BTreeMap<String, CatalogEntry>) -> Self {
        Self {
            entries,
            loaded_at: Utc::now(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.get(id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Case-insensitive substring match over name and identifier, ordered by identifier.
    pub fn search(&self, query: &str) -> Vec<&OrbitalObject> {
        let needle = query.trim().to_lowercase();
        self.entries
            .values()
            .map(|e| &e.object)
            .filter(|o| {
                o.name.to_lowercase().contains(&needle) || o.id.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

/// Read-mostly catalog. Readers clone the current snapshot pointer; a refresh swaps it.
#[derive(Default)]
pub struct Catalog {
    current: RwLock<Option<Arc<CatalogSnapshot>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: CatalogSnapshot) -> Self {
        let catalog = Self::new();
        catalog.replace(snapshot);
        catalog
    }

    pub fn snapshot(&self) -> Result<Arc<CatalogSnapshot>, CatalogError> {
        self.current.read().clone().ok_or(CatalogError::NotLoaded)
    }

    pub fn replace(&self, snapshot: CatalogSnapshot) {
        *self.current.write() = Some(Arc::new(snapshot));
    }

    pub fn find(&self, id: &str) -> Result<OrbitalObject, CatalogError> {
        let snapshot = self.snapshot()?;
        snapshot
            .get(id)
            .map(|e| e.object.clone())
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub fn search(&self, query: &str) -> Result<Vec<OrbitalObject>, CatalogError> {
        if query.trim().is_empty() {
            return Err(CatalogError::EmptyQuery);
        }
        let snapshot = self.snapshot()?;
        Ok(snapshot.search(query).into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hubble_record, iss_record, snapshot_of};

    #[test]
    fn unloaded_catalog_is_unavailable() {
        let catalog = Catalog::new();
        assert!(matches!(catalog.snapshot(), Err(CatalogError::NotLoaded)));
        assert!(matches!(catalog.find("25544"), Err(CatalogError::NotLoaded)));
    }

    #[test]
    fn finds_by_id() {
        let catalog = Catalog::with_snapshot(snapshot_of(vec![iss_record(), hubble_record()]));
        assert_eq!(catalog.find("25544").unwrap().name, "ISS (ZARYA)");
        assert!(matches!(catalog.find("99999"), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn search_is_case_insensitive_and_ordered_by_id() {
        let catalog = Catalog::with_snapshot(snapshot_of(vec![iss_record(), hubble_record()]));

        let by_name = catalog.search("hSt").unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "20580");

        // "5" appears in both identifiers
        let ids: Vec<_> = catalog
            .search("5")
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["20580", "25544"]);

        assert!(catalog.search("voyager").unwrap().is_empty());
    }

    #[test]
    fn blank_search_is_rejected() {
        let catalog = Catalog::with_snapshot(snapshot_of(vec![iss_record()]));
        assert!(matches!(catalog.search("   "), Err(CatalogError::EmptyQuery)));
    }

    #[test]
    fn replace_swaps_snapshot_for_new_readers_only() {
        let catalog = Catalog::with_snapshot(snapshot_of(vec![iss_record()]));
        let held = catalog.snapshot().unwrap();
        catalog.replace(snapshot_of(vec![iss_record(), hubble_record()]));
        assert_eq!(held.len(), 1);
        assert_eq!(catalog.snapshot().unwrap().len(), 2);
    }
}
