//! Host Module
//!
//! Capabilities the panel consumes from the design-tool host, expressed as
//! traits so the fetch orchestration never depends on a transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::HostError;
use crate::site::SiteInfo;

pub mod http;
pub mod mock;

pub use http::HttpHost;
pub use mock::{CallCounts, MockHost};

/// An element selected on the host canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Host element identifier, used as the snapshot cache key
    pub id: String,
    /// Host element type (e.g. "Block", "Heading")
    #[serde(rename = "type")]
    pub element_type: String,
}

impl Element {
    pub fn new(id: impl Into<String>, element_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            element_type: element_type.into(),
        }
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

/// A one-shot message shown to the user by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

/// Produces a fresh snapshot for an element. Called only on a cache miss.
#[async_trait]
pub trait SnapshotProducer: Send + Sync {
    /// Returns the encoded snapshot, or `None` when the host has nothing
    /// to offer for this element (e.g. unsupported element type).
    async fn produce_snapshot(&self, element_id: &str) -> Result<Option<String>, HostError>;
}

/// Shows notifications to the user.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<(), HostError>;
}

/// Provides metadata about the current site.
#[async_trait]
pub trait SiteInfoSource: Send + Sync {
    async fn site_info(&self) -> Result<SiteInfo, HostError>;
}

/// Reports the element currently selected on the canvas.
#[async_trait]
pub trait SelectionSource: Send + Sync {
    async fn selected_element(&self) -> Result<Option<Element>, HostError>;
}

/// Everything the panel needs from a host.
pub trait Host: SnapshotProducer + Notifier + SiteInfoSource + SelectionSource {}

impl<T> Host for T where T: SnapshotProducer + Notifier + SiteInfoSource + SelectionSource {}
