use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::manager::{ShieldManager, SweepReport};

/// Background task that retires expired shields.
pub struct ExpirationSweeper {
    manager: Arc<ShieldManager>,
    interval: Duration,
}

impl ExpirationSweeper {
    pub fn new(manager: Arc<ShieldManager>, interval: Duration) -> Self {
        Self { manager, interval }
    }

    fn run_cycle(&self) {
        let report = self.manager.sweep_expired();
        if report != SweepReport::default() {
            log::debug!(
                "Sweep cycle: {} expired, {} failed, {} evicted",
                report.expired,
                report.failed,
                report.evicted
            );
        }
    }

    /// Returns a handle that can be used to abort the task.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                self.run_cycle();
            }
        })
    }
}
