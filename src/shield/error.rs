use thiserror::Error;
use uuid::Uuid;

use super::types::{ShieldStatus, Tier};
use crate::error::ErrorKind;

#[derive(Debug, Error)]
pub enum ShieldError {
    #[error("Owner reference is required")]
    MissingOwner,
    #[error("Invalid shield center: {0}")]
    InvalidCenter(String),
    #[error("Radius must be a positive number of kilometers, got {0}")]
    RadiusNotPositive(f64),
    #[error("Radius {radius_km} km exceeds the {tier} maximum of {max_km} km")]
    InvalidRadius {
        tier: Tier,
        radius_km: f64,
        max_km: f64,
    },
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),
    #[error("Total active duration {requested} exceeds the {tier} maximum of {max}")]
    ExceedsMaxDuration {
        tier: Tier,
        requested: String,
        max: String,
    },
    #[error("Owner already holds active shield {existing} covering this location")]
    OverlappingShield { existing: Uuid },
    #[error("Privacy shield not found: {0}")]
    ShieldNotFound(Uuid),
    #[error("Privacy shield {id} is {status}")]
    ShieldNotActive { id: Uuid, status: ShieldStatus },
    #[error("Shield {id} cannot move from {from} to {to}")]
    InvalidTransition {
        id: Uuid,
        from: ShieldStatus,
        to: ShieldStatus,
    },
}

impl ShieldError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShieldError::MissingOwner
            | ShieldError::InvalidCenter(_)
            | ShieldError::RadiusNotPositive(_)
            | ShieldError::InvalidDuration(_) => ErrorKind::InvalidInput,
            ShieldError::ShieldNotFound(_) => ErrorKind::NotFound,
            ShieldError::InvalidRadius { .. }
            | ShieldError::ExceedsMaxDuration { .. }
            | ShieldError::OverlappingShield { .. }
            | ShieldError::ShieldNotActive { .. }
            | ShieldError::InvalidTransition { .. } => ErrorKind::PolicyViolation,
        }
    }

    /// Stable machine-readable code for the wire.
    pub fn code(&self) -> &'static str {
        match self {
            ShieldError::MissingOwner => "missing_owner",
            ShieldError::InvalidCenter(_) => "invalid_coordinates",
            ShieldError::RadiusNotPositive(_) => "invalid_radius",
            ShieldError::InvalidRadius { .. } => "radius_exceeds_tier",
            ShieldError::InvalidDuration(_) => "invalid_duration",
            ShieldError::ExceedsMaxDuration { .. } => "duration_exceeds_cap",
            ShieldError::OverlappingShield { .. } => "overlapping_shield",
            ShieldError::ShieldNotFound(_) => "shield_not_found",
            ShieldError::ShieldNotActive { .. } => "shield_not_active",
            ShieldError::InvalidTransition { .. } => "invalid_transition",
        }
    }
}
