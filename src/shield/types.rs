use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;
use uuid::Uuid;

use super::error::ShieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    Basic,
    Advanced,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShieldStatus {
    Pending,
    Active,
    Expired,
    Deactivated,
}

impl ShieldStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShieldStatus::Expired | ShieldStatus::Deactivated)
    }

    /// Status only ever moves forward: pending -> active -> expired | deactivated.
    pub fn can_transition_to(&self, next: ShieldStatus) -> bool {
        matches!(
            (self, next),
            (ShieldStatus::Pending, ShieldStatus::Active)
                | (ShieldStatus::Pending, ShieldStatus::Deactivated)
                | (ShieldStatus::Active, ShieldStatus::Expired)
                | (ShieldStatus::Active, ShieldStatus::Deactivated)
        )
    }
}

/// A time-bounded protection zone owned by one client.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Shield {
    #[serde(rename = "shield_id")]
    pub id: Uuid,
    pub owner: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    #[serde(rename = "shield_type")]
    pub tier: Tier,
    pub status: ShieldStatus,
    pub activated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deactivated_at: Option<DateTime<Utc>>,
}

impl Shield {
    pub fn transition(&mut self, next: ShieldStatus) -> Result<(), ShieldError> {
        if !self.status.can_transition_to(next) {
            return Err(ShieldError::InvalidTransition {
                id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.status == ShieldStatus::Active && self.expires_at > now
    }
}
