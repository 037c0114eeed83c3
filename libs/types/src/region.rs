//! Bounding regions, per-cell risk and region-level results

use chrono::{DateTime, Utc};
use geo::{coord, Polygon, Rect};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::errors::GeometryError;
use crate::feature::Feature;

/// Axis-aligned geographic rectangle in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Reject non-finite, inverted or out-of-range boxes.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let bounds = [self.min_lat, self.max_lat, self.min_lon, self.max_lon];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(invalid("coordinates must be finite"));
        }
        if self.min_lat > self.max_lat {
            return Err(invalid(format!(
                "min_lat {} exceeds max_lat {}",
                self.min_lat, self.max_lat
            )));
        }
        if self.min_lon > self.max_lon {
            return Err(invalid(format!(
                "min_lon {} exceeds max_lon {}",
                self.min_lon, self.max_lon
            )));
        }
        if self.min_lat < -90.0 || self.max_lat > 90.0 {
            return Err(invalid("latitude outside [-90, 90]"));
        }
        if self.min_lon < -180.0 || self.max_lon > 180.0 {
            return Err(invalid("longitude outside [-180, 180]"));
        }
        Ok(())
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        Rect::new(
            coord! { x: self.min_lon, y: self.min_lat },
            coord! { x: self.max_lon, y: self.max_lat },
        )
        .to_polygon()
    }

    /// Closed counter-clockwise exterior ring as `[lon, lat]` pairs.
    pub fn ring(&self) -> Vec<[f64; 2]> {
        vec![
            [self.min_lon, self.min_lat],
            [self.max_lon, self.min_lat],
            [self.max_lon, self.max_lat],
            [self.min_lon, self.max_lat],
            [self.min_lon, self.min_lat],
        ]
    }
}

fn invalid(reason: impl Into<String>) -> GeometryError {
    GeometryError::InvalidBoundingBox {
        reason: reason.into(),
    }
}

/// Score for one lattice cell. Exists only for the duration of one
/// assessment unless the caller asks for cell detail.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskCell {
    pub lat: f64,
    pub lon: f64,
    pub hazard_score: f64,
    pub precip_score: f64,
    pub moisture_score: f64,
    pub composite: f64,
}

/// Region-level composite risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRiskResult {
    pub assessment_id: Uuid,
    pub bounding_box: BoundingBox,
    /// Mean composite over cells that scored; 0 when none did
    pub average_risk: f64,
    pub cells_evaluated: usize,
    pub cells_failed: usize,
    pub as_of: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<RiskCell>>,
}

impl RegionRiskResult {
    pub fn bounding_polygon(&self) -> Polygon<f64> {
        self.bounding_box.to_polygon()
    }

    /// True when no cell could be scored, as opposed to a region that
    /// genuinely scored zero.
    pub fn is_total_failure(&self) -> bool {
        self.cells_evaluated == 0
    }

    pub fn to_feature(&self) -> Feature {
        Feature::polygon(
            self.bounding_box.ring(),
            json!({
                "assessment_id": self.assessment_id.to_string(),
                "average_risk": self.average_risk,
                "cells_evaluated": self.cells_evaluated,
                "cells_failed": self.cells_failed,
                "as_of": self.as_of.to_rfc3339(),
            }),
        )
    }
}
