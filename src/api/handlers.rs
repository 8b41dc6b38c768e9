//! API Handlers
//!
//! HTTP request handlers for each panel endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{SharedCache, SnapshotCache};
use crate::config::Config;
use crate::error::{PanelError, Result};
use crate::host::{Host, SelectionSource};
use crate::models::{
    HealthResponse, PanelResponse, SelectionRequest, SelectionResponse, SiteSection,
    StatsResponse,
};
use crate::selection::SelectionTracker;
use crate::site::SiteInfoLoader;
use crate::snapshot::{SnapshotFetcher, SnapshotState};

/// Application state shared across all handlers.
///
/// The cache is created here and owned by the state; nothing in the crate
/// keeps it in a global.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Thread-safe snapshot cache
    pub cache: SharedCache,
    pub selection: SelectionTracker,
    pub site: SiteInfoLoader,
    /// Where to ask for the selection when the panel asks to resync
    pub selection_source: Arc<dyn SelectionSource>,
}

impl AppState {
    /// Wires the cache and every host-backed component together.
    pub fn new<H>(config: Config, cache: SnapshotCache, host: Arc<H>) -> Self
    where
        H: Host + 'static,
    {
        let cache = cache.shared();
        let fetcher = SnapshotFetcher::new(cache.clone(), host.clone(), host.clone());
        let site = SiteInfoLoader::new(host.clone(), host.clone());
        Self {
            config: Arc::new(config),
            cache,
            selection: SelectionTracker::new(fetcher),
            site,
            selection_source: host,
        }
    }

    /// Creates a new AppState with the cache sized by the configuration.
    pub fn from_config<H>(config: Config, host: Arc<H>) -> Self
    where
        H: Host + 'static,
    {
        let cache = SnapshotCache::from_config(&config);
        Self::new(config, cache, host)
    }

    pub fn fetcher(&self) -> &SnapshotFetcher {
        self.selection.fetcher()
    }
}

/// Handler for GET /panel
///
/// Returns everything the panel renders: site card, selected element and
/// the snapshot state for it.
pub async fn panel_handler(State(state): State<AppState>) -> Json<PanelResponse> {
    let site = SiteSection::new(state.site.state().await, &state.config);
    let selected_element = state.selection.current().await;

    Json(PanelResponse {
        site,
        selected_element,
        snapshot: state.fetcher().current(),
    })
}

/// Handler for PUT /selection
///
/// Applies a selection change pushed by the host. On a cache miss the
/// snapshot is fetched in the background and the response reports loading.
pub async fn selection_handler(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(PanelError::InvalidRequest(error_msg));
    }

    info!(
        element = ?req.element.as_ref().map(|e| e.id.as_str()),
        "selection changed"
    );
    // The fetch keeps running after we answer; its result lands in the
    // published snapshot state.
    let _fetch = state.selection.set(req.element).await;

    Ok(Json(SelectionResponse {
        selected_element: state.selection.current().await,
        snapshot: state.fetcher().current(),
    }))
}

/// Handler for POST /selection/refresh
///
/// Pulls the current selection from the host instead of waiting for a push.
pub async fn refresh_selection_handler(
    State(state): State<AppState>,
) -> Result<Json<SelectionResponse>> {
    let _fetch = state
        .selection
        .refresh_from(state.selection_source.as_ref())
        .await?;

    Ok(Json(SelectionResponse {
        selected_element: state.selection.current().await,
        snapshot: state.fetcher().current(),
    }))
}

/// Handler for GET /snapshot/:element_id
///
/// Resolves one snapshot through the cache without changing the selection.
pub async fn snapshot_handler(
    State(state): State<AppState>,
    Path(element_id): Path<String>,
) -> Result<Json<SnapshotState>> {
    if element_id.trim().is_empty() {
        return Err(PanelError::InvalidRequest(
            "Element id cannot be empty".to_string(),
        ));
    }

    Ok(Json(state.fetcher().get_snapshot(&element_id).await))
}

/// Handler for GET /stats
///
/// Returns current snapshot cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(
        cache.stats(),
        cache.ttl_ms(),
        cache.max_size(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
