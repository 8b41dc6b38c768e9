//! Selection Module
//!
//! Tracks the element selected on the host canvas and re-keys the snapshot
//! request whenever the selected element id changes.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::HostError;
use crate::host::{Element, SelectionSource};
use crate::snapshot::{SnapshotFetcher, SnapshotState};

// == Selection Tracker ==
/// Current selection plus the fetcher it drives.
#[derive(Clone)]
pub struct SelectionTracker {
    current: Arc<RwLock<Option<Element>>>,
    fetcher: SnapshotFetcher,
}

impl SelectionTracker {
    pub fn new(fetcher: SnapshotFetcher) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            fetcher,
        }
    }

    /// Records a selection change reported by the host.
    ///
    /// Only a change of element id starts a new snapshot request; the same
    /// element reported again (even with a different type) does not refetch.
    /// Returns the spawned fetch, if one was started.
    pub async fn set(&self, element: Option<Element>) -> Option<JoinHandle<SnapshotState>> {
        let mut current = self.current.write().await;

        let previous_id = current.as_ref().map(|e| e.id.clone());
        let next_id = element.as_ref().map(|e| e.id.clone());
        *current = element;

        if previous_id == next_id {
            return None;
        }

        debug!(from = ?previous_id, to = ?next_id, "selection changed");
        // Held across select so concurrent changes apply in order.
        self.fetcher.select(next_id).await
    }

    /// Asks the host for its current selection and applies it.
    pub async fn refresh_from(
        &self,
        source: &dyn SelectionSource,
    ) -> Result<Option<JoinHandle<SnapshotState>>, HostError> {
        let element = source.selected_element().await?;
        Ok(self.set(element).await)
    }

    /// Currently selected element.
    pub async fn current(&self) -> Option<Element> {
        self.current.read().await.clone()
    }

    pub fn fetcher(&self) -> &SnapshotFetcher {
        &self.fetcher
    }
}
