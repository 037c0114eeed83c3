//! Correlation thresholds and policy

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How to choose among candidates that all pass the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// First qualifying candidate in the order the catalog returned them.
    FirstInFeedOrder,
    /// Qualifying candidate closest to the observation; earliest in feed
    /// order on ties.
    Nearest,
}

/// Correlator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelatorConfig {
    /// Candidates must be strictly closer than this (km)
    pub max_distance_km: f64,
    /// Maximum |severity - magnitude| accepted, inclusive
    pub max_severity_delta: f64,
    /// Half-width of the search window around the observation (days)
    pub search_window_days: i64,
    /// Deadline for the bulk catalog fetch (milliseconds)
    pub fetch_timeout_ms: u64,
    pub policy: MatchPolicy,
}

impl CorrelatorConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            max_distance_km: 100.0,
            max_severity_delta: 0.3,
            search_window_days: 1,
            fetch_timeout_ms: 30_000,
            policy: MatchPolicy::FirstInFeedOrder,
        }
    }
}
