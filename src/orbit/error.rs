use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Debug, Error)]
pub enum OrbitError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),
    #[error("Propagation error for {id}: {message}")]
    Propagation { id: String, message: String },
    #[error("Invalid orbital elements: {0}")]
    InvalidElements(String),
    #[error("Orbital state source unavailable: {0}")]
    Unavailable(String),
}

impl OrbitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrbitError::ObjectNotFound(_) => ErrorKind::NotFound,
            OrbitError::InvalidElements(_) => ErrorKind::InvalidInput,
            OrbitError::Propagation { .. } | OrbitError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }
}
