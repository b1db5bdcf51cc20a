use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::catalog::{Catalog, CatalogLoader};

/// Periodically reloads catalog sources and swaps in the new snapshot.
///
/// A failed reload keeps serving the previous snapshot.
pub fn spawn_refresh(
    catalog: Arc<Catalog>,
    loader: CatalogLoader,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick fires immediately; the initial load already happened at startup
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let loader = loader.clone();
            match tokio::task::spawn_blocking(move || loader.load()).await {
                Ok(Ok(snapshot)) => {
                    log::debug!("Catalog refreshed ({} objects)", snapshot.len());
                    catalog.replace(snapshot);
                }
                Ok(Err(e)) => log::warn!("Catalog refresh failed, keeping previous: {}", e),
                Err(e) => log::error!("Catalog refresh task panicked: {}", e),
            }
        }
    })
}
