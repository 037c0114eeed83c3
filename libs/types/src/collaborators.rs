//! Contracts for the external collaborators the engines consume
//!
//! Implementations must be safe to share across concurrent calls; the
//! engines hold them behind `Arc<dyn ...>` and never lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use geo::Polygon;

use crate::candidate::{RawCandidate, TimeRange};
use crate::errors::{CatalogError, StoreError, TelemetryError};
use crate::hazard::{HazardCategory, HazardRecord};
use crate::telemetry::TelemetryReading;

/// Windowed bulk access to a secondary event catalog
#[async_trait]
pub trait EventCatalog: Send + Sync {
    /// All events of `category` reported inside `window`, in feed order.
    async fn query_by_window(
        &self,
        category: HazardCategory,
        window: TimeRange,
    ) -> Result<Vec<RawCandidate>, CatalogError>;
}

/// Spatial access to stored hazard records
#[async_trait]
pub trait HazardStore: Send + Sync {
    /// Records of `category` reported at or after `since` whose affected
    /// area intersects `area`.
    async fn query_intersecting(
        &self,
        category: HazardCategory,
        area: &Polygon<f64>,
        since: DateTime<Utc>,
    ) -> Result<Vec<HazardRecord>, StoreError>;
}

/// Point telemetry over a trailing window
#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        lookback_days: u32,
    ) -> Result<TelemetryReading, TelemetryError>;
}
