mod clock;
mod error;
mod manager;
mod policy;
mod sweeper;
mod types;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use error::ShieldError;
pub use manager::{ShieldManager, ShieldRequest, SweepReport, DEFAULT_RETENTION};
pub use policy::{ShieldPolicy, TierPolicy};
pub use sweeper::ExpirationSweeper;
pub use types::{Shield, ShieldStatus, Tier};
