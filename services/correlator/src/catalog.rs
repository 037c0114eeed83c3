//! GDACS event-list catalog client

use std::time::Duration;

use async_trait::async_trait;
use hazard_types::candidate::{RawCandidate, TimeRange};
use hazard_types::collaborators::EventCatalog;
use hazard_types::errors::CatalogError;
use hazard_types::hazard::HazardCategory;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// GDACS client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GdacsConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Alert levels requested from the event list
    pub alert_levels: Vec<String>,
    /// Per-request transport timeout (milliseconds)
    pub request_timeout_ms: u64,
}

impl Default for GdacsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.gdacs.org/gdacsapi/api".to_string(),
            alert_levels: vec!["Green".into(), "Orange".into(), "Red".into()],
            request_timeout_ms: 60_000,
        }
    }
}

/// Secondary catalog backed by the GDACS event-list search
#[derive(Debug, Clone)]
pub struct GdacsCatalog {
    http_client: reqwest::Client,
    config: GdacsConfig,
}

impl GdacsCatalog {
    pub fn new(config: GdacsConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        Ok(Self {
            http_client,
            config,
        })
    }

    /// Search URL for one category and window. GDACS filters by calendar
    /// day, so the window is widened to whole dates.
    pub fn search_url(&self, category: HazardCategory, window: TimeRange) -> String {
        format!(
            "{}/Events/geteventlist/search?fromDate={}&toDate={}&alertlevel={}&eventlist={}",
            self.config.base_url,
            window.start.format("%Y-%m-%d"),
            window.end.format("%Y-%m-%d"),
            self.config.alert_levels.join(";"),
            category.gdacs_code(),
        )
    }
}

#[async_trait]
impl EventCatalog for GdacsCatalog {
    async fn query_by_window(
        &self,
        category: HazardCategory,
        window: TimeRange,
    ) -> Result<Vec<RawCandidate>, CatalogError> {
        let url = self.search_url(category, window);
        let res = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        if !res.status().is_success() {
            return Err(CatalogError::Unavailable {
                status: res.status().as_u16(),
            });
        }

        let body: Value = res
            .json()
            .await
            .map_err(|e| CatalogError::MalformedResponse(e.to_string()))?;

        let features = features_of(body)?;
        debug!(url = %url, features = features.len(), "GDACS window fetched");
        Ok(features)
    }
}

/// Extract the `features` array; a body without one is an empty window.
fn features_of(body: Value) -> Result<Vec<RawCandidate>, CatalogError> {
    match body {
        Value::Object(mut map) => match map.remove("features") {
            Some(Value::Array(features)) => Ok(features),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(CatalogError::MalformedResponse(format!(
                "features is not an array: {other}"
            ))),
        },
        other => Err(CatalogError::MalformedResponse(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
