//! Scripted host for tests and local runs
//!
//! Configure responses with the builder methods, then hand the mock to the
//! fetcher or the API state. Every call is counted for assertions.
//!
//! # Example
//! ```ignore
//! let host = MockHost::new()
//!     .with_snapshot("abc", "data:image/png;base64,AAAA")
//!     .await;
//! let snapshot = host.produce_snapshot("abc").await?;
//! assert_eq!(host.calls().await.snapshots_for("abc"), 1);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use super::{Element, Notification, Notifier, SelectionSource, SiteInfoSource, SnapshotProducer};
use crate::error::HostError;
use crate::site::SiteInfo;

/// Scripted answer for one element's snapshot.
#[derive(Debug, Clone)]
enum SnapshotReply {
    Image(String),
    Empty,
    Fail(String),
}

/// Tracks host call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    /// Snapshot calls per element id
    pub snapshots: HashMap<String, usize>,
    pub site_info: usize,
    pub selected_element: usize,
}

impl CallCounts {
    /// Snapshot calls made for `element_id`.
    pub fn snapshots_for(&self, element_id: &str) -> usize {
        self.snapshots.get(element_id).copied().unwrap_or(0)
    }

    /// Snapshot calls across all elements.
    pub fn total_snapshots(&self) -> usize {
        self.snapshots.values().sum()
    }
}

/// In-memory host with scripted responses.
#[derive(Clone, Default)]
pub struct MockHost {
    replies: Arc<Mutex<HashMap<String, SnapshotReply>>>,
    gates: Arc<Mutex<HashMap<String, Arc<Notify>>>>,
    site: Arc<Mutex<Option<SiteInfo>>>,
    selection: Arc<Mutex<Option<Element>>>,
    notifications: Arc<Mutex<Vec<Notification>>>,
    calls: Arc<Mutex<CallCounts>>,
}

impl MockHost {
    /// Create a mock with no snapshots, no site and nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer snapshot requests for `element_id` with `snapshot`.
    pub async fn with_snapshot(self, element_id: &str, snapshot: &str) -> Self {
        self.replies
            .lock()
            .await
            .insert(element_id.to_string(), SnapshotReply::Image(snapshot.to_string()));
        self
    }

    /// Answer snapshot requests for `element_id` with "nothing available".
    pub async fn with_empty_snapshot(self, element_id: &str) -> Self {
        self.replies
            .lock()
            .await
            .insert(element_id.to_string(), SnapshotReply::Empty);
        self
    }

    /// Fail snapshot requests for `element_id`.
    pub async fn with_snapshot_error(self, element_id: &str, message: &str) -> Self {
        self.replies
            .lock()
            .await
            .insert(element_id.to_string(), SnapshotReply::Fail(message.to_string()));
        self
    }

    /// Serve `site` from `site_info`. Without it, `site_info` fails.
    pub async fn with_site(self, site: SiteInfo) -> Self {
        *self.site.lock().await = Some(site);
        self
    }

    /// Report `element` as the current selection.
    pub async fn with_selection(self, element: Element) -> Self {
        *self.selection.lock().await = Some(element);
        self
    }

    /// Hold snapshot calls for `element_id` until the returned handle is
    /// notified with `notify_one`.
    pub async fn gate(&self, element_id: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .await
            .insert(element_id.to_string(), notify.clone());
        notify
    }

    /// Notifications received so far.
    pub async fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().await.clone()
    }

    /// Call counts so far.
    pub async fn calls(&self) -> CallCounts {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl SnapshotProducer for MockHost {
    async fn produce_snapshot(&self, element_id: &str) -> Result<Option<String>, HostError> {
        *self
            .calls
            .lock()
            .await
            .snapshots
            .entry(element_id.to_string())
            .or_insert(0) += 1;

        let gate = self.gates.lock().await.get(element_id).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        match self.replies.lock().await.get(element_id).cloned() {
            Some(SnapshotReply::Image(image)) => Ok(Some(image)),
            Some(SnapshotReply::Empty) | None => Ok(None),
            Some(SnapshotReply::Fail(message)) => Err(HostError::Rejected(message)),
        }
    }
}

#[async_trait]
impl Notifier for MockHost {
    async fn notify(&self, notification: Notification) -> Result<(), HostError> {
        self.notifications.lock().await.push(notification);
        Ok(())
    }
}

#[async_trait]
impl SiteInfoSource for MockHost {
    async fn site_info(&self) -> Result<SiteInfo, HostError> {
        self.calls.lock().await.site_info += 1;
        self.site
            .lock()
            .await
            .clone()
            .ok_or_else(|| HostError::Network("Failed to connect to host".to_string()))
    }
}

#[async_trait]
impl SelectionSource for MockHost {
    async fn selected_element(&self) -> Result<Option<Element>, HostError> {
        self.calls.lock().await.selected_element += 1;
        Ok(self.selection.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_replies() {
        let host = MockHost::new()
            .with_snapshot("img", "data:image/png;base64,AAAA")
            .await
            .with_empty_snapshot("empty")
            .await
            .with_snapshot_error("bad", "boom")
            .await;

        assert_eq!(
            host.produce_snapshot("img").await.unwrap(),
            Some("data:image/png;base64,AAAA".to_string())
        );
        assert_eq!(host.produce_snapshot("empty").await.unwrap(), None);
        assert_eq!(host.produce_snapshot("unknown").await.unwrap(), None);
        assert!(host.produce_snapshot("bad").await.is_err());

        let calls = host.calls().await;
        assert_eq!(calls.snapshots_for("img"), 1);
        assert_eq!(calls.total_snapshots(), 4);
    }

    #[tokio::test]
    async fn test_gate_holds_until_notified() {
        let host = MockHost::new().with_snapshot("slow", "snap").await;
        let gate = host.gate("slow").await;

        let task = {
            let host = host.clone();
            tokio::spawn(async move { host.produce_snapshot("slow").await })
        };

        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.notify_one();
        assert_eq!(task.await.unwrap().unwrap(), Some("snap".to_string()));
    }

    #[tokio::test]
    async fn test_site_info_without_site_fails() {
        let host = MockHost::new();
        assert!(host.site_info().await.is_err());
        assert_eq!(host.calls().await.site_info, 1);
    }
}
