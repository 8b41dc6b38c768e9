//! Response DTOs for the panel API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::config::Config;
use crate::host::Element;
use crate::site::{SiteInfo, SiteState};
use crate::snapshot::SnapshotState;

/// Site card of the panel
#[derive(Debug, Clone, Serialize)]
pub struct SiteSection {
    pub info: Option<SiteInfo>,
    pub is_loading: bool,
    pub has_error: bool,
    /// Link to the published staging site, when there is one
    pub staging_url: Option<String>,
}

impl SiteSection {
    pub fn new(state: SiteState, config: &Config) -> Self {
        let staging_url = state.info.as_ref().and_then(|info| info.staging_url(config));
        Self {
            info: state.info,
            is_loading: state.is_loading,
            has_error: state.has_error,
            staging_url,
        }
    }
}

/// Response body for the panel view (GET /panel)
#[derive(Debug, Clone, Serialize)]
pub struct PanelResponse {
    pub site: SiteSection,
    /// Currently selected element, None shows the empty state
    pub selected_element: Option<Element>,
    pub snapshot: SnapshotState,
}

/// Response body for a selection change (PUT /selection)
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResponse {
    pub selected_element: Option<Element>,
    /// Snapshot state right after the change (loading on a cache miss)
    pub snapshot: SnapshotState,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that fell through to the host
    pub misses: u64,
    /// Capacity evictions
    pub evictions: u64,
    /// Entries removed by expiry sweeps
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub ttl_ms: u64,
    pub max_size: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: CacheStats, ttl_ms: u64, max_size: usize) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            ttl_ms,
            max_size,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
