//! Cache Module
//!
//! Bounded snapshot cache with lazy TTL expiry and oldest-first eviction.

mod clock;
mod entry;
mod order;
mod stats;
mod store;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use store::{SharedCache, SnapshotCache};

// == Public Constants ==
/// Default freshness window (one minute)
pub const DEFAULT_TTL_MS: u64 = 60_000;

/// Default number of snapshots kept
pub const DEFAULT_MAX_SIZE: usize = 3;
