//! Site Info Module
//!
//! Site metadata model and the one-shot loader that fetches it at startup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::host::{Notification, Notifier, SiteInfoSource};

/// Message shown to the user when site metadata cannot be loaded
pub const SITE_INFO_ERROR_MESSAGE: &str = "Unable to load site info";

/// Publishing stage of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainStage {
    Staging,
    Production,
}

/// A domain the site is published to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub url: String,
    /// Last publish time as reported by the host, None if never published
    pub last_published: Option<String>,
    pub default: bool,
    pub stage: DomainStage,
}

/// Metadata about the current site, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub site_id: String,
    pub site_name: String,
    pub short_name: String,
    pub is_password_protected: bool,
    pub is_private_staging: bool,
    pub workspace_id: String,
    pub workspace_slug: String,
    #[serde(default)]
    pub domains: Vec<Domain>,
}

impl SiteInfo {
    /// Whether a staging domain has been published at least once.
    pub fn has_published_staging(&self) -> bool {
        self.domains
            .iter()
            .any(|d| d.stage == DomainStage::Staging && d.last_published.is_some())
    }

    /// Link to the published staging site, if there is one.
    pub fn staging_url(&self, config: &Config) -> Option<String> {
        self.has_published_staging().then(|| {
            format!(
                "https://{}.{}?utm_source={}",
                self.short_name, config.staging_domain_suffix, config.staging_utm_source
            )
        })
    }
}

/// Observable state of the site info request.
#[derive(Debug, Clone, Serialize)]
pub struct SiteState {
    pub info: Option<SiteInfo>,
    pub is_loading: bool,
    pub has_error: bool,
}

impl Default for SiteState {
    fn default() -> Self {
        // Loading until the first attempt finishes.
        Self {
            info: None,
            is_loading: true,
            has_error: false,
        }
    }
}

// == Site Info Loader ==
/// Fetches site info once and remembers the outcome.
#[derive(Clone)]
pub struct SiteInfoLoader {
    source: Arc<dyn SiteInfoSource>,
    notifier: Arc<dyn Notifier>,
    state: Arc<RwLock<SiteState>>,
}

impl SiteInfoLoader {
    pub fn new(source: Arc<dyn SiteInfoSource>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source,
            notifier,
            state: Arc::new(RwLock::new(SiteState::default())),
        }
    }

    /// Fetches site info from the host.
    ///
    /// On failure the error flag is set and the user is notified once.
    /// Loading is cleared either way.
    pub async fn load(&self) {
        match self.source.site_info().await {
            Ok(site) => {
                info!(site = %site.site_name, "site info loaded");
                let mut state = self.state.write().await;
                state.info = Some(site);
                state.has_error = false;
                state.is_loading = false;
            }
            Err(err) => {
                warn!(error = %err, "failed to load site info");
                {
                    let mut state = self.state.write().await;
                    state.has_error = true;
                    state.is_loading = false;
                }
                if let Err(err) = self
                    .notifier
                    .notify(Notification::error(SITE_INFO_ERROR_MESSAGE))
                    .await
                {
                    warn!(error = %err, "failed to deliver notification");
                }
            }
        }
    }

    /// Current state of the request.
    pub async fn state(&self) -> SiteState {
        self.state.read().await.clone()
    }
}
