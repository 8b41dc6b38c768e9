//! Snapshot Fetcher
//!
//! Consults the cache before calling the snapshot producer, and publishes
//! per-request state for whichever element is current.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::SnapshotState;
use crate::cache::SharedCache;
use crate::host::{Notification, Notifier, SnapshotProducer};

/// Message shown to the user when the producer fails
pub const SNAPSHOT_ERROR_MESSAGE: &str = "Unable to load screenshot";

// == Snapshot Fetcher ==
/// Cache-first snapshot orchestration.
///
/// Producer failures never escape: they become `has_error` plus exactly one
/// user notification. Empty results set `has_error` without notifying.
/// There is no retry and no timeout; a producer that never answers leaves
/// the request loading.
#[derive(Clone)]
pub struct SnapshotFetcher {
    cache: SharedCache,
    producer: Arc<dyn SnapshotProducer>,
    notifier: Arc<dyn Notifier>,
    state: Arc<watch::Sender<SnapshotState>>,
    /// Serializes `select` so the published key follows call order
    selecting: Arc<Mutex<()>>,
}

impl SnapshotFetcher {
    pub fn new(
        cache: SharedCache,
        producer: Arc<dyn SnapshotProducer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(SnapshotState::idle());
        Self {
            cache,
            producer,
            notifier,
            state: Arc::new(state),
            selecting: Arc::new(Mutex::new(())),
        }
    }

    /// The cache this fetcher reads and fills.
    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    // == Get Snapshot ==
    /// Resolves the snapshot for `element_id` without touching the
    /// published state.
    ///
    /// A fresh cache entry is returned without calling the producer.
    pub async fn get_snapshot(&self, element_id: &str) -> SnapshotState {
        if let Some(snapshot) = self.cache.read().await.lookup(element_id) {
            debug!(element_id, "snapshot cache hit");
            return SnapshotState::ready(element_id, snapshot);
        }
        self.fetch_uncached(element_id).await
    }

    // == Select ==
    /// Makes `element_id` the current request and publishes its state.
    ///
    /// On a cache hit the ready state is published immediately and `None`
    /// is returned. On a miss a loading state is published and the producer
    /// call runs in a spawned task whose handle is returned. When that task
    /// finishes it always fills the cache for its own key, but publishes
    /// only if its key is still current. Superseded calls are not aborted.
    pub async fn select(&self, element_id: Option<String>) -> Option<JoinHandle<SnapshotState>> {
        let _selecting = self.selecting.lock().await;

        let Some(element_id) = element_id else {
            self.state.send_replace(SnapshotState::idle());
            return None;
        };

        if let Some(snapshot) = self.cache.read().await.lookup(&element_id) {
            debug!(element_id = %element_id, "snapshot cache hit");
            self.state.send_replace(SnapshotState::ready(&element_id, snapshot));
            return None;
        }

        self.state.send_replace(SnapshotState::loading(&element_id));

        let fetcher = self.clone();
        Some(tokio::spawn(async move {
            let result = fetcher.fetch_uncached(&element_id).await;
            let published = fetcher.state.send_if_modified(|current| {
                if current.is_for(&element_id) {
                    *current = result.clone();
                    true
                } else {
                    false
                }
            });
            if !published {
                debug!(element_id = %element_id, "discarding snapshot for superseded selection");
            }
            result
        }))
    }

    /// Latest published state.
    pub fn current(&self) -> SnapshotState {
        self.state.borrow().clone()
    }

    /// Watches published state changes.
    pub fn subscribe(&self) -> watch::Receiver<SnapshotState> {
        self.state.subscribe()
    }

    async fn fetch_uncached(&self, element_id: &str) -> SnapshotState {
        debug!(element_id, "snapshot cache miss, calling producer");

        match self.producer.produce_snapshot(element_id).await {
            Ok(Some(snapshot)) if !snapshot.is_empty() => {
                self.cache
                    .write()
                    .await
                    .insert(element_id.to_string(), snapshot.clone());
                info!(element_id, bytes = snapshot.len(), "snapshot cached");
                SnapshotState::ready(element_id, snapshot)
            }
            Ok(_) => {
                debug!(element_id, "producer returned no snapshot");
                SnapshotState::failed(element_id)
            }
            Err(err) => {
                warn!(element_id, error = %err, "snapshot producer failed");
                if let Err(err) = self
                    .notifier
                    .notify(Notification::error(SNAPSHOT_ERROR_MESSAGE))
                    .await
                {
                    warn!(error = %err, "failed to deliver notification");
                }
                SnapshotState::failed(element_id)
            }
        }
    }
}
