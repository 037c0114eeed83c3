//! Hazard categories, severity levels and stored hazard records

use chrono::{DateTime, Utc};
use geo::{MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hazard category shared by the store, the catalog and the engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardCategory {
    Earthquake,
    Flood,
    Wildfire,
}

impl HazardCategory {
    /// Event-type code used by the GDACS feed
    pub fn gdacs_code(&self) -> &'static str {
        match self {
            HazardCategory::Earthquake => "EQ",
            HazardCategory::Flood => "FL",
            HazardCategory::Wildfire => "WF",
        }
    }

    pub fn from_gdacs_code(code: &str) -> Option<Self> {
        match code {
            "EQ" => Some(HazardCategory::Earthquake),
            "FL" => Some(HazardCategory::Flood),
            "WF" => Some(HazardCategory::Wildfire),
            _ => None,
        }
    }
}

impl fmt::Display for HazardCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gdacs_code())
    }
}

/// Severity of a stored hazard record, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityLevel {
    Low,
    Moderate,
    Severe,
    Extreme,
}

impl SeverityLevel {
    /// Map a GDACS flood alert score onto a severity level.
    ///
    /// A missing score falls back to `Low`.
    pub fn from_flood_alert_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= 2.0 => SeverityLevel::Severe,
            Some(s) if s >= 1.0 => SeverityLevel::Moderate,
            _ => SeverityLevel::Low,
        }
    }

    /// Map a wildfire burned area (hectares) onto a severity level.
    pub fn from_burned_area(hectares: Option<f64>) -> Self {
        match hectares {
            Some(h) if h >= 10_000.0 => SeverityLevel::Extreme,
            Some(h) if h >= 5_000.0 => SeverityLevel::Severe,
            Some(h) if h >= 1_000.0 => SeverityLevel::Moderate,
            _ => SeverityLevel::Low,
        }
    }
}

/// Affected-area geometry as stored; either shape is accepted and
/// normalized to a multipolygon before any spatial test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HazardGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl From<Polygon<f64>> for HazardGeometry {
    fn from(polygon: Polygon<f64>) -> Self {
        HazardGeometry::Polygon(polygon)
    }
}

impl From<MultiPolygon<f64>> for HazardGeometry {
    fn from(multi: MultiPolygon<f64>) -> Self {
        HazardGeometry::MultiPolygon(multi)
    }
}

/// A historical hazard record returned by the hazard store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardRecord {
    pub category: HazardCategory,
    pub severity_level: SeverityLevel,
    pub affected_area: HazardGeometry,
    pub reported_at: DateTime<Utc>,
}

impl HazardRecord {
    pub fn new(
        category: HazardCategory,
        severity_level: SeverityLevel,
        affected_area: impl Into<HazardGeometry>,
        reported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            category,
            severity_level,
            affected_area: affected_area.into(),
            reported_at,
        }
    }
}
