//! Expiry Sweep Task
//!
//! Background task that periodically removes expired snapshots.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that periodically sweeps expired snapshots.
///
/// The task loops forever, sleeping for `interval` between sweeps and
/// taking the cache write lock only for the sweep itself.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = SnapshotCache::new(60_000, 3).shared();
/// let sweep_handle = spawn_sweep_task(cache.clone(), Duration::from_secs(30));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expiry sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep_expired()
            };

            if removed > 0 {
                info!("Expiry sweep: removed {} stale snapshots", removed);
            } else {
                debug!("Expiry sweep: no stale snapshots found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cache::{ManualClock, SnapshotCache};

    const TTL: u64 = 60_000;

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let clock = ManualClock::new(0);
        let cache = SnapshotCache::with_clock(TTL, 3, Arc::new(clock.clone())).shared();

        cache
            .write()
            .await
            .insert("expire_soon".to_string(), "snap".to_string());
        clock.advance(TTL);

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(
            !cache.read().await.contains_key("expire_soon"),
            "Expired entry should have been swept"
        );

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_fresh_entries() {
        let clock = ManualClock::new(0);
        let cache = SnapshotCache::with_clock(TTL, 3, Arc::new(clock.clone())).shared();

        cache
            .write()
            .await
            .insert("fresh".to_string(), "snap".to_string());
        clock.advance(TTL - 1);

        let handle = spawn_sweep_task(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.read().await.lookup("fresh"), Some("snap".to_string()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = SnapshotCache::new(TTL, 3).shared();

        let handle = spawn_sweep_task(cache, Duration::from_secs(1));
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
