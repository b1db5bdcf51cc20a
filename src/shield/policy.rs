use serde::Deserialize;
use std::time::Duration;

use super::types::Tier;
use crate::config::deserialize_duration;

/// Radius and duration limits attached to one tier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierPolicy {
    pub default_radius_km: f64,
    pub max_radius_km: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub default_duration: Duration,
    /// Cap on `expires_at - activated_at`, including extensions.
    #[serde(deserialize_with = "deserialize_duration")]
    pub max_total_duration: Duration,
}

impl TierPolicy {
    const fn new(default_km: f64, max_km: f64, default_hours: u64, max_hours: u64) -> Self {
        Self {
            default_radius_km: default_km,
            max_radius_km: max_km,
            default_duration: Duration::from_secs(default_hours * 3600),
            max_total_duration: Duration::from_secs(max_hours * 3600),
        }
    }

    fn validate(&self, tier: Tier) -> Result<(), String> {
        if !(self.default_radius_km > 0.0 && self.default_radius_km <= self.max_radius_km) {
            return Err(format!(
                "{tier}: default radius must be positive and within max radius"
            ));
        }
        if self.default_duration.is_zero() || self.default_duration > self.max_total_duration {
            return Err(format!(
                "{tier}: default duration must be positive and within max total duration"
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShieldPolicy {
    pub basic: TierPolicy,
    pub advanced: TierPolicy,
    pub premium: TierPolicy,
}

impl Default for ShieldPolicy {
    fn default() -> Self {
        Self {
            basic: TierPolicy::new(1.0, 1.5, 1, 4),
            advanced: TierPolicy::new(2.0, 3.0, 4, 12),
            premium: TierPolicy::new(5.0, 7.0, 12, 48),
        }
    }
}

impl ShieldPolicy {
    pub fn for_tier(&self, tier: Tier) -> &TierPolicy {
        match tier {
            Tier::Basic => &self.basic,
            Tier::Advanced => &self.advanced,
            Tier::Premium => &self.premium,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for tier in [Tier::Basic, Tier::Advanced, Tier::Premium] {
            self.for_tier(tier).validate(tier)?;
        }
        Ok(())
    }
}
