//! Stats Reporter Task
//!
//! Background task that periodically logs the counters of every group.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::group::Registry;

/// Spawns a background task that logs each group's statistics.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between reports. Reading the counters only takes the registry's shared
/// lock and each cache's mutex briefly, so it never waits on a load.
///
/// # Arguments
/// * `registry` - Groups to report on
/// * `interval_secs` - Interval in seconds between reports (minimum 1)
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_stats_reporter(registry: Arc<Registry>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting stats reporter with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let groups = registry.groups();
            if groups.is_empty() {
                debug!("Stats reporter: no groups registered");
                continue;
            }

            for group in groups {
                let stats = group.stats();
                let cache = group.cache_stats();
                info!(
                    group = group.name(),
                    gets = stats.gets,
                    cache_hits = stats.cache_hits,
                    peer_loads = stats.peer_loads,
                    peer_errors = stats.peer_errors,
                    local_loads = stats.local_loads,
                    local_load_errors = stats.local_load_errors,
                    cache_items = cache.items,
                    cache_bytes = cache.bytes,
                    evictions = cache.evictions,
                    "group stats"
                );
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::group::GetterFn;

    #[tokio::test]
    async fn test_reporter_keeps_running() {
        let registry = Arc::new(Registry::new());
        registry.new_group(
            "scores",
            0,
            GetterFn(|_key: &str| -> Result<Vec<u8>> { Ok(b"v".to_vec()) }),
        );

        let handle = spawn_stats_reporter(registry, 1);
        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert!(!handle.is_finished(), "Reporter should still be running");
        handle.abort();
    }

    #[tokio::test]
    async fn test_reporter_can_be_aborted() {
        let handle = spawn_stats_reporter(Arc::new(Registry::new()), 1);

        // Abort immediately
        handle.abort();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
