//! Snapshot request state as seen by the panel.

use serde::Serialize;

/// Outcome of the snapshot request for the current element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotState {
    /// Element the state belongs to, None when nothing is selected
    pub element_id: Option<String>,
    /// Encoded snapshot, when available
    pub snapshot: Option<String>,
    pub is_loading: bool,
    pub has_error: bool,
}

impl SnapshotState {
    /// Nothing selected.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Waiting on the producer for `element_id`.
    pub fn loading(element_id: &str) -> Self {
        Self {
            element_id: Some(element_id.to_string()),
            is_loading: true,
            ..Self::default()
        }
    }

    /// Snapshot available for `element_id`.
    pub fn ready(element_id: &str, snapshot: String) -> Self {
        Self {
            element_id: Some(element_id.to_string()),
            snapshot: Some(snapshot),
            ..Self::default()
        }
    }

    /// No snapshot could be obtained for `element_id`.
    pub fn failed(element_id: &str) -> Self {
        Self {
            element_id: Some(element_id.to_string()),
            has_error: true,
            ..Self::default()
        }
    }

    /// Whether this state belongs to `element_id`.
    pub fn is_for(&self, element_id: &str) -> bool {
        self.element_id.as_deref() == Some(element_id)
    }
}
