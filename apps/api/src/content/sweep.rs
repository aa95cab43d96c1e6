use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::content::lifecycle::ContentLifecycle;

/// Runs the expiry sweep every `every`, starting immediately. A failed run is
/// logged and the next tick tries again.
pub fn spawn_expiry_sweep(lifecycle: ContentLifecycle, every: Duration) -> JoinHandle<()> {
    info!(
        "Expiry sweep scheduled every {}s (retention {} days)",
        every.as_secs(),
        lifecycle.retention_days()
    );

    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = lifecycle.sweep_expired().await {
                error!("Expiry sweep failed: {e}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration as ChronoDuration;
    use uuid::Uuid;

    use super::*;
    use crate::content::lifecycle::testing::record;
    use crate::content::store::testing::MemoryContentStore;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_sweeps_immediately() {
        let store = Arc::new(MemoryContentStore::default());
        let owner = Uuid::new_v4();
        store
            .records
            .lock()
            .unwrap()
            .push(record(owner, "velho", ChronoDuration::days(30)));

        let handle = spawn_expiry_sweep(
            ContentLifecycle::new(store.clone(), 7),
            Duration::from_secs(3600),
        );
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(store.all().is_empty());
        handle.abort();
    }
}
