mod error;
mod loader;
mod refresh;
mod store;
mod types;

pub use error::CatalogError;
pub use loader::{entry_from_record, CatalogLoader};
pub use refresh::spawn_refresh;
pub use store::{Catalog, CatalogEntry, CatalogSnapshot};
pub use types::{CatalogRecord, ObjectCategory, ObjectSummary, OrbitalObject};
