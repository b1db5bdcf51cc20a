mod elements;
mod error;
mod kepler;
mod propagation;
mod provider;
mod types;

pub use elements::{KeplerElements, OrbitalElements, Propagator};
pub use error::OrbitError;
pub use provider::{state_of, StateProvider};
pub use types::{normalize_longitude, OrbitSummary, OrbitalState, EARTH_RADIUS_KM};
