mod engine;
mod error;
mod geometry;
mod observation;
mod pass_finder;
mod types;

pub use engine::{VisibilityCriteria, VisibilityEngine};
pub use error::VisibilityError;
pub use geometry::ground_distance_km;
pub use observation::ObservationPoint;
pub use types::{Pass, VisibleSatellite};
