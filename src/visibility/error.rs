use thiserror::Error;

use crate::catalog::CatalogError;
use crate::error::ErrorKind;
use crate::orbit::OrbitError;

#[derive(Debug, Error)]
pub enum VisibilityError {
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),
    #[error("Invalid search radius: {0} km")]
    InvalidRadius(f64),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Orbit(#[from] OrbitError),
}

impl VisibilityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VisibilityError::InvalidObservation(_) | VisibilityError::InvalidRadius(_) => {
                ErrorKind::InvalidInput
            }
            VisibilityError::Catalog(e) => e.kind(),
            VisibilityError::Orbit(e) => e.kind(),
        }
    }
}
