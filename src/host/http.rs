//! HTTP host bridge client
//!
//! Talks to the host application through a small JSON bridge:
//! - `GET  {base}/elements/{id}/snapshot` -> `{"snapshot": string | null}`
//! - `GET  {base}/selection` -> `{"element": Element | null}`
//! - `GET  {base}/site` -> `SiteInfo`
//! - `POST {base}/notify` <- `Notification`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::{Element, Notification, Notifier, SelectionSource, SiteInfoSource, SnapshotProducer};
use crate::error::HostError;
use crate::site::SiteInfo;

/// Per-request timeout for host calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct SnapshotBody {
    snapshot: Option<String>,
}

#[derive(Deserialize)]
struct SelectionBody {
    element: Option<Element>,
}

/// Host bridge client.
#[derive(Debug, Clone)]
pub struct HttpHost {
    http: HttpClient,
    base_url: Url,
}

impl HttpHost {
    /// Create a client for the bridge at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, HostError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HostError::Rejected(format!("Invalid host URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(HostError::Rejected(format!(
                "Host URL '{}' cannot be a base",
                base_url
            )));
        }

        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HostError::Network(e.to_string()))?;

        Ok(Self { http, base_url })
    }

    /// Joins path segments onto the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, HostError> {
        debug!(%url, "host GET");
        let response = self.http.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => {
                let data = response.json::<T>().await.map_err(|e| {
                    HostError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                Ok(Some(data))
            }
            status => Err(status_error(status, response).await),
        }
    }
}

async fn status_error(status: StatusCode, response: reqwest::Response) -> HostError {
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| format!("Unexpected status code: {}", status));
    HostError::Status {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl SnapshotProducer for HttpHost {
    async fn produce_snapshot(&self, element_id: &str) -> Result<Option<String>, HostError> {
        let url = self.url(&["elements", element_id, "snapshot"]);
        let body: Option<SnapshotBody> = self.get_json(url).await?;
        Ok(body.and_then(|b| b.snapshot))
    }
}

#[async_trait]
impl SelectionSource for HttpHost {
    async fn selected_element(&self) -> Result<Option<Element>, HostError> {
        let body: Option<SelectionBody> = self.get_json(self.url(&["selection"])).await?;
        Ok(body.and_then(|b| b.element))
    }
}

#[async_trait]
impl SiteInfoSource for HttpHost {
    async fn site_info(&self) -> Result<SiteInfo, HostError> {
        self.get_json(self.url(&["site"]))
            .await?
            .ok_or_else(|| HostError::Rejected("Host has no site loaded".to_string()))
    }
}

#[async_trait]
impl Notifier for HttpHost {
    async fn notify(&self, notification: Notification) -> Result<(), HostError> {
        let url = self.url(&["notify"]);
        debug!(%url, message = %notification.message, "host notify");
        let response = self.http.post(url).json(&notification).send().await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_segments() {
        let host = HttpHost::new("http://127.0.0.1:1337/bridge/").unwrap();
        let url = host.url(&["elements", "abc-123", "snapshot"]);
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:1337/bridge/elements/abc-123/snapshot"
        );
    }

    #[test]
    fn test_url_encodes_element_id() {
        let host = HttpHost::new("http://localhost:1337").unwrap();
        let url = host.url(&["elements", "a/b c", "snapshot"]);
        assert_eq!(url.as_str(), "http://localhost:1337/elements/a%2Fb%20c/snapshot");
    }

    #[test]
    fn test_rejects_invalid_url() {
        assert!(HttpHost::new("not a url").is_err());
        assert!(HttpHost::new("mailto:someone@example.com").is_err());
    }
}
