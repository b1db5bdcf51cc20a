use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::OrbitError;
use super::types::{OrbitSummary, OrbitalState};
use super::{kepler, propagation};

/// Element set as it appears in the catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrbitalElements {
    Tle { line1: String, line2: String },
    Kepler(KeplerElements),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct KeplerElements {
    pub epoch: DateTime<Utc>,
    pub inclination_deg: f64,
    pub period_minutes: f64,
    #[serde(default)]
    pub eccentricity: f64,
    /// Geographic longitude of the ascending node at epoch.
    pub node_longitude_deg: f64,
    #[serde(default)]
    pub argument_of_perigee_deg: f64,
    #[serde(default)]
    pub mean_anomaly_deg: f64,
}

impl KeplerElements {
    fn validate(&self) -> Result<(), OrbitError> {
        if !(0.0..=180.0).contains(&self.inclination_deg) {
            return Err(OrbitError::InvalidElements(format!(
                "inclination {} outside [0, 180]",
                self.inclination_deg
            )));
        }
        if !(self.period_minutes.is_finite() && self.period_minutes > 0.0) {
            return Err(OrbitError::InvalidElements(format!(
                "period {} must be positive",
                self.period_minutes
            )));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(OrbitError::InvalidElements(format!(
                "eccentricity {} outside [0, 1)",
                self.eccentricity
            )));
        }
        for (name, value) in [
            ("node longitude", self.node_longitude_deg),
            ("argument of perigee", self.argument_of_perigee_deg),
            ("mean anomaly", self.mean_anomaly_deg),
        ] {
            if !value.is_finite() {
                return Err(OrbitError::InvalidElements(format!(
                    "{name} {value} is not a finite angle"
                )));
            }
        }
        Ok(())
    }
}

/// Element set prepared for repeated propagation.
pub enum Propagator {
    Sgp4 {
        elements: Box<sgp4::Elements>,
        constants: Box<sgp4::Constants>,
    },
    Kepler(KeplerElements),
}

impl Propagator {
    pub fn compile(source: &OrbitalElements) -> Result<Self, OrbitError> {
        match source {
            OrbitalElements::Tle { line1, line2 } => {
                let elements = sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
                    .map_err(|e| OrbitError::InvalidElements(e.to_string()))?;
                let constants = sgp4::Constants::from_elements(&elements)
                    .map_err(|e| OrbitError::InvalidElements(e.to_string()))?;
                Ok(Propagator::Sgp4 {
                    elements: Box::new(elements),
                    constants: Box::new(constants),
                })
            }
            OrbitalElements::Kepler(k) => {
                k.validate()?;
                Ok(Propagator::Kepler(*k))
            }
        }
    }

    pub fn from_sgp4(elements: sgp4::Elements) -> Result<Self, OrbitError> {
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| OrbitError::InvalidElements(e.to_string()))?;
        Ok(Propagator::Sgp4 {
            elements: Box::new(elements),
            constants: Box::new(constants),
        })
    }

    pub fn summary(&self) -> OrbitSummary {
        match self {
            Propagator::Sgp4 { elements, .. } => OrbitSummary::from_mean_motion(
                DateTime::<Utc>::from_naive_utc_and_offset(elements.datetime, Utc),
                elements.inclination,
                1440.0 / elements.mean_motion,
                elements.eccentricity,
            ),
            Propagator::Kepler(k) => OrbitSummary::from_mean_motion(
                k.epoch,
                k.inclination_deg,
                k.period_minutes,
                k.eccentricity,
            ),
        }
    }

    /// Position at `timestamp`. The message of a failure is left to the caller to attribute.
    pub fn propagate(&self, timestamp: DateTime<Utc>) -> Result<OrbitalState, String> {
        match self {
            Propagator::Sgp4 {
                elements,
                constants,
            } => propagation::sgp4_state(elements, constants, timestamp),
            Propagator::Kepler(k) => Ok(kepler::propagate(k, timestamp)),
        }
    }
}
