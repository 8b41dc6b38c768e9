//! Snapshot Panel - backend for a design-tool side panel
//!
//! Shows site metadata and a preview of the selected canvas element,
//! caching element snapshots with a TTL and a capacity bound.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod host;
pub mod models;
pub mod selection;
pub mod site;
pub mod snapshot;
pub mod tasks;

pub use api::AppState;
pub use cache::{SharedCache, SnapshotCache};
pub use config::Config;
pub use snapshot::{SnapshotFetcher, SnapshotState};
pub use tasks::spawn_sweep_task;
