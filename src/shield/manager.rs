use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::clock::Clock;
use super::error::ShieldError;
use super::policy::ShieldPolicy;
use super::types::{Shield, ShieldStatus, Tier};
use crate::visibility::ground_distance_km;

pub const DEFAULT_RETENTION: Duration = Duration::from_secs(3600);

/// Parameters of an activation. Unset radius and duration fall back to the tier defaults.
#[derive(Debug, Clone)]
pub struct ShieldRequest {
    pub owner: String,
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: Option<f64>,
    pub tier: Tier,
    pub duration: Option<Duration>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub expired: usize,
    pub failed: usize,
    /// Ended records dropped after the retention period.
    pub evicted: usize,
}

#[derive(Default)]
struct Arena {
    shields: HashMap<Uuid, Arc<Mutex<Shield>>>,
    /// Live shields only. Ended shields leave the index as soon as they end.
    by_owner: HashMap<String, Vec<Uuid>>,
}

impl Arena {
    fn unindex(&mut self, owner: &str, id: Uuid) {
        if let Some(ids) = self.by_owner.get_mut(owner) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_owner.remove(owner);
            }
        }
    }
}

/// Owns every shield record.
///
/// Lock order is arena first, then record. Only `activate` holds both, so
/// the overlap check and the insert happen atomically per owner. Every other
/// mutation clones the record handle out of the arena and takes the record
/// lock alone, then releases it before touching the owner index.
///
/// Ended records stay readable through `get` for `retention`, after which
/// the sweep drops them.
pub struct ShieldManager {
    arena: RwLock<Arena>,
    policy: ShieldPolicy,
    clock: Arc<dyn Clock>,
    retention: Duration,
}

impl ShieldManager {
    pub fn new(policy: ShieldPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            arena: RwLock::new(Arena::default()),
            policy,
            clock,
            retention: DEFAULT_RETENTION,
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub fn activate(&self, request: ShieldRequest) -> Result<Shield, ShieldError> {
        let owner = request.owner.trim();
        if owner.is_empty() {
            return Err(ShieldError::MissingOwner);
        }
        validate_center(request.latitude, request.longitude)?;

        let tier = request.tier;
        let limits = self.policy.for_tier(tier);

        let radius_km = request.radius_km.unwrap_or(limits.default_radius_km);
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(ShieldError::RadiusNotPositive(radius_km));
        }
        if radius_km > limits.max_radius_km {
            return Err(ShieldError::InvalidRadius {
                tier,
                radius_km,
                max_km: limits.max_radius_km,
            });
        }

        let duration = request.duration.unwrap_or(limits.default_duration);
        if duration.is_zero() {
            return Err(ShieldError::InvalidDuration(
                "duration must be positive".into(),
            ));
        }
        if duration > limits.max_total_duration {
            return Err(ShieldError::ExceedsMaxDuration {
                tier,
                requested: humantime::format_duration(duration).to_string(),
                max: humantime::format_duration(limits.max_total_duration).to_string(),
            });
        }
        let lifetime = to_chrono(duration)?;

        let mut arena = self.arena.write();
        let now = self.clock.now();

        if let Some(ids) = arena.by_owner.get(owner) {
            for id in ids {
                let Some(record) = arena.shields.get(id) else {
                    continue;
                };
                let existing = record.lock();
                if existing.is_active_at(now)
                    && ground_distance_km(
                        existing.latitude,
                        existing.longitude,
                        request.latitude,
                        request.longitude,
                    ) <= radius_km
                {
                    return Err(ShieldError::OverlappingShield {
                        existing: existing.id,
                    });
                }
            }
        }

        let mut shield = Shield {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            latitude: request.latitude,
            longitude: request.longitude,
            radius_km,
            tier,
            status: ShieldStatus::Pending,
            activated_at: now,
            expires_at: now + lifetime,
            deactivated_at: None,
        };
        shield.transition(ShieldStatus::Active)?;

        arena
            .by_owner
            .entry(shield.owner.clone())
            .or_default()
            .push(shield.id);
        arena
            .shields
            .insert(shield.id, Arc::new(Mutex::new(shield.clone())));

        log::info!(
            "Activated {} shield {} for {} at ({:.4}, {:.4}) r={} km until {}",
            shield.tier,
            shield.id,
            shield.owner,
            shield.latitude,
            shield.longitude,
            shield.radius_km,
            shield.expires_at
        );
        Ok(shield)
    }

    /// Pushes the expiration of an active shield further out.
    ///
    /// Rejected outright, not capped, when the total lifetime would exceed the tier cap.
    pub fn extend(&self, id: Uuid, additional: Duration) -> Result<Shield, ShieldError> {
        if additional.is_zero() {
            return Err(ShieldError::InvalidDuration(
                "extension must be positive".into(),
            ));
        }
        let additional = to_chrono(additional)?;
        let record = self.record(id)?;
        let mut shield = record.lock();
        let now = self.clock.now();

        if expire_if_due(&mut shield, now)? {
            let owner = shield.owner.clone();
            drop(shield);
            self.arena.write().unindex(&owner, id);
            return Err(ShieldError::ShieldNotActive {
                id,
                status: ShieldStatus::Expired,
            });
        }
        if shield.status != ShieldStatus::Active {
            return Err(ShieldError::ShieldNotActive {
                id,
                status: shield.status,
            });
        }

        let limits = self.policy.for_tier(shield.tier);
        let max = to_chrono(limits.max_total_duration)?;
        let current = shield.expires_at - shield.activated_at;
        let total = current
            .checked_add(&additional)
            .filter(|total| *total <= max)
            .ok_or_else(|| ShieldError::ExceedsMaxDuration {
                tier: shield.tier,
                requested: format_chrono(current, additional),
                max: humantime::format_duration(limits.max_total_duration).to_string(),
            })?;

        let expires_at = shield.activated_at + total;
        shield.expires_at = expires_at;
        log::info!("Extended shield {} until {}", id, expires_at);
        Ok(shield.clone())
    }

    /// Ends a shield early. Already ended shields are returned unchanged.
    pub fn deactivate(&self, id: Uuid) -> Result<Shield, ShieldError> {
        let record = self.record(id)?;
        let mut shield = record.lock();
        let now = self.clock.now();

        let ended_now = if expire_if_due(&mut shield, now)? {
            true
        } else if shield.status.is_terminal() {
            log::debug!("Shield {} already {}", id, shield.status);
            false
        } else {
            shield.transition(ShieldStatus::Deactivated)?;
            shield.deactivated_at = Some(now);
            log::info!("Deactivated shield {}", id);
            true
        };

        let ended = shield.clone();
        drop(shield);
        if ended_now {
            self.arena.write().unindex(&ended.owner, id);
        }
        Ok(ended)
    }

    pub fn get(&self, id: Uuid) -> Result<Shield, ShieldError> {
        let record = self.record(id)?;
        let shield = record.lock().clone();
        Ok(shield)
    }

    /// Shields of `owner` whose recorded status is active, oldest first.
    pub fn list_active(&self, owner: &str) -> Vec<Shield> {
        let records: Vec<_> = {
            let arena = self.arena.read();
            arena
                .by_owner
                .get(owner.trim())
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| arena.shields.get(id).cloned())
                        .collect()
                })
                .unwrap_or_default()
        };

        let mut active: Vec<Shield> = records
            .iter()
            .map(|record| record.lock().clone())
            .filter(|shield| shield.status == ShieldStatus::Active)
            .collect();
        active.sort_by(|a, b| {
            a.activated_at
                .cmp(&b.activated_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        active
    }

    /// Moves every active shield past its expiration to expired, drops ended
    /// shields from the owner index and evicts records ended longer than the
    /// retention period ago.
    ///
    /// A record that fails to transition is logged and skipped.
    pub fn sweep_expired(&self) -> SweepReport {
        let records: Vec<_> = self.arena.read().shields.values().cloned().collect();
        let now = self.clock.now();
        let retention = to_chrono(self.retention).ok();
        let mut report = SweepReport::default();
        let mut ended = Vec::new();
        let mut evict = Vec::new();

        for record in records {
            let mut shield = record.lock();
            if shield.status == ShieldStatus::Active && shield.expires_at <= now {
                match shield.transition(ShieldStatus::Expired) {
                    Ok(()) => {
                        log::info!("Shield {} of {} expired", shield.id, shield.owner);
                        report.expired += 1;
                    }
                    Err(e) => {
                        log::warn!("Failed to expire shield {}: {}", shield.id, e);
                        report.failed += 1;
                        continue;
                    }
                }
            }

            let Some(since) = ended_at(&shield) else {
                continue;
            };
            ended.push((shield.owner.clone(), shield.id));
            if retention
                .and_then(|retention| since.checked_add_signed(retention))
                .is_some_and(|until| until <= now)
            {
                evict.push(shield.id);
            }
        }

        if !ended.is_empty() {
            let mut arena = self.arena.write();
            for (owner, id) in &ended {
                arena.unindex(owner, *id);
            }
            for id in &evict {
                arena.shields.remove(id);
            }
        }
        report.evicted = evict.len();
        if report.evicted > 0 {
            log::debug!("Evicted {} ended shields", report.evicted);
        }
        report
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.arena.read().shields.len()
    }

    #[cfg(test)]
    fn indexed(&self, owner: &str) -> usize {
        self.arena
            .read()
            .by_owner
            .get(owner)
            .map_or(0, |ids| ids.len())
    }

    fn record(&self, id: Uuid) -> Result<Arc<Mutex<Shield>>, ShieldError> {
        self.arena
            .read()
            .shields
            .get(&id)
            .cloned()
            .ok_or(ShieldError::ShieldNotFound(id))
    }
}

/// Applies an expiration the sweeper has not reached yet. Returns whether it did.
fn expire_if_due(shield: &mut Shield, now: DateTime<Utc>) -> Result<bool, ShieldError> {
    if shield.status == ShieldStatus::Active && shield.expires_at <= now {
        shield.transition(ShieldStatus::Expired)?;
        return Ok(true);
    }
    Ok(false)
}

fn ended_at(shield: &Shield) -> Option<DateTime<Utc>> {
    match shield.status {
        ShieldStatus::Expired => Some(shield.expires_at),
        ShieldStatus::Deactivated => Some(shield.deactivated_at.unwrap_or(shield.expires_at)),
        ShieldStatus::Pending | ShieldStatus::Active => None,
    }
}

fn validate_center(latitude: f64, longitude: f64) -> Result<(), ShieldError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(ShieldError::InvalidCenter(format!(
            "latitude {latitude} outside [-90, 90]"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(ShieldError::InvalidCenter(format!(
            "longitude {longitude} outside [-180, 180]"
        )));
    }
    Ok(())
}

fn to_chrono(duration: Duration) -> Result<chrono::Duration, ShieldError> {
    chrono::Duration::from_std(duration)
        .map_err(|_| ShieldError::InvalidDuration(format!("{duration:?} is out of range")))
}

fn format_chrono(current: chrono::Duration, additional: chrono::Duration) -> String {
    match (current.to_std(), additional.to_std()) {
        (Ok(a), Ok(b)) => humantime::format_duration(a.saturating_add(b)).to_string(),
        _ => format!("{current} + {additional}"),
    }
}
