//! Snapshot Module
//!
//! Fetch orchestration on top of the snapshot cache.

mod fetcher;
mod state;

pub use fetcher::{SnapshotFetcher, SNAPSHOT_ERROR_MESSAGE};
pub use state::SnapshotState;
