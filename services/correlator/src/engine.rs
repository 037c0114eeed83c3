//! Event correlator
//!
//! Matches one observation against the secondary catalog. Acceptance
//! requires `distance < max_distance_km` and
//! `|severity - magnitude| <= max_severity_delta`.

use std::sync::Arc;

use hazard_types::candidate::{CandidateEvent, MatchResult, RawCandidate, TimeRange};
use hazard_types::collaborators::EventCatalog;
use hazard_types::errors::CatalogError;
use hazard_types::hazard::HazardCategory;
use hazard_types::observation::Observation;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{CorrelatorConfig, MatchPolicy};

/// Errors surfaced by [`EventCorrelator::correlate`].
///
/// "No match" is not an error; it is `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),

    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    #[error("Catalog fetch timed out after {timeout_ms} ms")]
    CatalogTimeout { timeout_ms: u64 },
}

impl CorrelationError {
    /// Whether the outcome of the correlation is unknown because the
    /// catalog could not be read.
    pub fn is_catalog_failure(&self) -> bool {
        matches!(
            self,
            CorrelationError::CatalogUnavailable(_) | CorrelationError::CatalogTimeout { .. }
        )
    }
}

/// Stateless correlator over a shared catalog
#[derive(Clone)]
pub struct EventCorrelator {
    catalog: Arc<dyn EventCatalog>,
    config: CorrelatorConfig,
}

impl EventCorrelator {
    /// Create a correlator with default thresholds
    pub fn new(catalog: Arc<dyn EventCatalog>) -> Self {
        Self::with_config(catalog, CorrelatorConfig::default())
    }

    /// Create a correlator with custom configuration
    pub fn with_config(catalog: Arc<dyn EventCatalog>, config: CorrelatorConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &CorrelatorConfig {
        &self.config
    }

    /// Correlate using the configured search window.
    pub async fn correlate(
        &self,
        observation: &Observation,
    ) -> Result<Option<MatchResult>, CorrelationError> {
        self.correlate_within(observation, self.config.search_window_days)
            .await
    }

    /// Correlate against catalog events within `search_window_days` on
    /// either side of the observation time.
    ///
    /// The catalog is read once, under the configured fetch deadline.
    /// Unreachable or failing catalogs are an error; an empty or
    /// non-matching window is `Ok(None)`.
    pub async fn correlate_within(
        &self,
        observation: &Observation,
        search_window_days: i64,
    ) -> Result<Option<MatchResult>, CorrelationError> {
        validate_observation(observation)?;
        if search_window_days < 0 {
            return Err(CorrelationError::InvalidObservation(format!(
                "search window must not be negative, got {search_window_days} days"
            )));
        }

        let window =
            TimeRange::around(observation.observed_at, search_window_days).ok_or_else(|| {
                CorrelationError::InvalidObservation(format!(
                    "search window of {search_window_days} days is out of range"
                ))
            })?;
        let fetch = self
            .catalog
            .query_by_window(HazardCategory::Earthquake, window);

        let candidates = match tokio::time::timeout(self.config.fetch_timeout(), fetch).await {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(e)) => {
                warn!(error = %e, "Catalog fetch failed");
                return Err(e.into());
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.fetch_timeout_ms,
                    "Catalog fetch timed out"
                );
                return Err(CorrelationError::CatalogTimeout {
                    timeout_ms: self.config.fetch_timeout_ms,
                });
            }
        };

        debug!(
            candidates = candidates.len(),
            window_start = %window.start,
            window_end = %window.end,
            "Catalog window fetched"
        );

        let result = select_match(observation, &candidates, &self.config);
        match &result {
            Some(m) => info!(
                external_id = %m.matched.external_id,
                distance_km = m.distance_km,
                severity_delta = m.severity_delta,
                "Observation correlated"
            ),
            None => info!(
                candidates = candidates.len(),
                source_id = observation.source_id.as_deref().unwrap_or("-"),
                "No correlated event in window"
            ),
        }
        Ok(result)
    }
}

fn validate_observation(observation: &Observation) -> Result<(), CorrelationError> {
    if !observation.position().is_finite() {
        return Err(CorrelationError::InvalidObservation(
            "position must be finite".to_string(),
        ));
    }
    if !observation.magnitude.is_finite() {
        return Err(CorrelationError::InvalidObservation(
            "magnitude must be finite".to_string(),
        ));
    }
    Ok(())
}

/// Scan already-fetched candidates for a match.
///
/// Candidates that fail to parse are skipped. Under
/// [`MatchPolicy::FirstInFeedOrder`] the scan stops at the first
/// qualifying candidate.
pub fn select_match(
    observation: &Observation,
    candidates: &[RawCandidate],
    config: &CorrelatorConfig,
) -> Option<MatchResult> {
    let origin = observation.position();
    let mut best: Option<MatchResult> = None;

    for (index, raw) in candidates.iter().enumerate() {
        let candidate = match CandidateEvent::from_gdacs_feature(raw) {
            Ok(c) => c,
            Err(e) => {
                warn!(index, error = %e, "Skipping unreadable candidate");
                continue;
            }
        };

        let distance_km = geometry::distance_km(origin, candidate.position());
        let severity_delta = (candidate.severity - observation.magnitude).abs();
        let accepted =
            distance_km < config.max_distance_km && severity_delta <= config.max_severity_delta;

        debug!(
            index,
            external_id = %candidate.external_id,
            distance_km,
            severity_delta,
            accepted,
            "Candidate evaluated"
        );

        if !accepted {
            continue;
        }

        let found = MatchResult {
            report_url: candidate.report_url.clone(),
            matched: candidate,
            distance_km,
            severity_delta,
        };

        match config.policy {
            MatchPolicy::FirstInFeedOrder => return Some(found),
            MatchPolicy::Nearest => {
                let closer = best
                    .as_ref()
                    .map_or(true, |b| found.distance_km < b.distance_km);
                if closer {
                    best = Some(found);
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hazard_types::observation::GeoPoint;
    use serde_json::{json, Value};

    fn observation() -> Observation {
        Observation::new(
            34.05,
            -118.25,
            5.2,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        )
    }

    fn gdacs(id: u64, lat: f64, lon: f64, severity: f64) -> Value {
        json!({
            "geometry": {"type": "Point", "coordinates": [lon, lat]},
            "properties": {
                "eventtype": "EQ",
                "eventid": id,
                "severitydata": {"severity": severity},
                "url": {"report": format!("https://www.gdacs.org/report.aspx?eventid={id}")}
            }
        })
    }

    #[test]
    fn test_nearby_candidate_matches() {
        let candidates = vec![gdacs(1, 34.06, -118.24, 5.4)];
        let m = select_match(&observation(), &candidates, &CorrelatorConfig::default()).unwrap();
        assert_eq!(m.matched.external_id, "EQ1");
        assert!(m.distance_km < 2.0);
        assert!(m.report_url.ends_with("eventid=1"));
    }

    #[test]
    fn test_empty_window_is_none() {
        assert!(select_match(&observation(), &[], &CorrelatorConfig::default()).is_none());
    }

    #[test]
    fn test_far_candidate_rejected() {
        // ~1.5 degrees of latitude, well beyond 100 km
        let candidates = vec![gdacs(1, 35.55, -118.25, 5.2)];
        assert!(select_match(&observation(), &candidates, &CorrelatorConfig::default()).is_none());
    }

    #[test]
    fn test_severity_delta_rejected() {
        let candidates = vec![gdacs(1, 34.05, -118.25, 5.6)];
        assert!(select_match(&observation(), &candidates, &CorrelatorConfig::default()).is_none());
    }

    #[test]
    fn test_severity_delta_edge_is_inclusive() {
        let at = |magnitude: f64| {
            Observation::new(34.05, -118.25, magnitude, observation().observed_at)
        };
        let config = CorrelatorConfig {
            max_severity_delta: 0.25,
            ..CorrelatorConfig::default()
        };
        let candidates = vec![gdacs(1, 34.05, -118.25, 5.25)];
        let m = select_match(&at(5.0), &candidates, &config).unwrap();
        assert_eq!(m.severity_delta, 0.25);
        assert!(select_match(&at(4.9375), &candidates, &config).is_none());

        // 5.2 against 5.5 sits on the default 0.3 edge
        let candidates = vec![gdacs(2, 34.05, -118.25, 5.5)];
        assert!(select_match(&observation(), &candidates, &CorrelatorConfig::default()).is_some());
    }

    #[test]
    fn test_distance_edge_is_exclusive() {
        let origin = Observation::new(0.0, 0.0, 5.0, observation().observed_at);
        let inside = gdacs(1, 0.90, 0.0, 5.0); // ~99.5 km
        let outside = gdacs(2, 0.91, 0.0, 5.0); // ~100.6 km
        let config = CorrelatorConfig::default();
        assert!(select_match(&origin, &[inside.clone()], &config).is_some());
        assert!(select_match(&origin, &[outside], &config).is_none());

        let exact = geometry::distance_km(origin.position(), GeoPoint::new(0.90, 0.0));
        let at_limit = CorrelatorConfig {
            max_distance_km: exact,
            ..CorrelatorConfig::default()
        };
        assert!(select_match(&origin, &[inside], &at_limit).is_none());
    }

    #[test]
    fn test_first_in_feed_order_wins() {
        let candidates = vec![
            gdacs(1, 34.40, -118.25, 5.2), // ~39 km
            gdacs(2, 34.05, -118.25, 5.2), // exact
        ];
        let m = select_match(&observation(), &candidates, &CorrelatorConfig::default()).unwrap();
        assert_eq!(m.matched.external_id, "EQ1");
    }

    #[test]
    fn test_nearest_policy_picks_closest() {
        let candidates = vec![
            gdacs(1, 34.40, -118.25, 5.2),
            gdacs(2, 34.05, -118.25, 5.2),
            gdacs(3, 34.20, -118.25, 5.2),
        ];
        let config = CorrelatorConfig {
            policy: MatchPolicy::Nearest,
            ..CorrelatorConfig::default()
        };
        let m = select_match(&observation(), &candidates, &config).unwrap();
        assert_eq!(m.matched.external_id, "EQ2");
        assert_eq!(m.distance_km, 0.0);
    }

    #[test]
    fn test_unreadable_candidate_skipped() {
        let candidates = vec![
            json!({"geometry": null, "properties": {}}),
            json!("not even an object"),
            gdacs(7, 34.06, -118.24, 5.3),
        ];
        let m = select_match(&observation(), &candidates, &CorrelatorConfig::default()).unwrap();
        assert_eq!(m.matched.external_id, "EQ7");
    }

    #[test]
    fn test_error_classification() {
        let err: CorrelationError = CatalogError::Unavailable { status: 502 }.into();
        assert!(err.is_catalog_failure());
        assert!(CorrelationError::CatalogTimeout { timeout_ms: 5 }.is_catalog_failure());
        assert!(!CorrelationError::InvalidObservation("x".into()).is_catalog_failure());
    }
}
