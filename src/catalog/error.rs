use thiserror::Error;

use crate::error::ErrorKind;
use crate::orbit::OrbitError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TLE directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("Catalog file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid catalog file {file}: {message}")]
    InvalidCatalog { file: String, message: String },
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("Invalid elements for {id}: {source}")]
    InvalidElements {
        id: String,
        #[source]
        source: OrbitError,
    },
    #[error("Duplicate object id in catalog file: {0}")]
    DuplicateId(String),
    #[error("Satellite not found: {0}")]
    NotFound(String),
    #[error("Satellite catalog not loaded")]
    NotLoaded,
    #[error("Search query is required")]
    EmptyQuery,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::EmptyQuery => ErrorKind::InvalidInput,
            CatalogError::DirectoryNotFound(_)
            | CatalogError::FileRead(_)
            | CatalogError::InvalidCatalog { .. }
            | CatalogError::InvalidTle { .. }
            | CatalogError::InvalidElements { .. }
            | CatalogError::DuplicateId(_)
            | CatalogError::NotLoaded => ErrorKind::Unavailable,
        }
    }
}
