//! Seismic observations submitted for cross-catalog correlation

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::FeedParseError;

/// A geographic position in decimal degrees (WGS84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// A seismic event as reported by the primary catalog.
///
/// Built per correlation request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: f64,
    pub observed_at: DateTime<Utc>,
    /// Identifier in the primary catalog, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl Observation {
    pub fn new(latitude: f64, longitude: f64, magnitude: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            magnitude,
            observed_at,
            source_id: None,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Build an observation from a USGS GeoJSON feature.
    ///
    /// Coordinates are `[lon, lat, depth]`. The timestamp is taken from
    /// `properties.reported_at` (naive ISO-8601, UTC) when present,
    /// otherwise from `properties.time` in epoch milliseconds.
    pub fn from_usgs_feature(feature: &Value) -> Result<Self, FeedParseError> {
        let coords = feature
            .pointer("/geometry/coordinates")
            .and_then(Value::as_array)
            .ok_or_else(|| FeedParseError::missing("geometry.coordinates"))?;
        let longitude = coord_at(coords, 0, "geometry.coordinates[0]")?;
        let latitude = coord_at(coords, 1, "geometry.coordinates[1]")?;

        let properties = feature
            .get("properties")
            .ok_or_else(|| FeedParseError::missing("properties"))?;
        let magnitude = properties
            .get("mag")
            .and_then(Value::as_f64)
            .ok_or_else(|| FeedParseError::missing("properties.mag"))?;

        let observed_at = if let Some(raw) = properties.get("reported_at").and_then(Value::as_str) {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map_err(|e| FeedParseError::invalid("properties.reported_at", e.to_string()))?
                .and_utc()
        } else {
            let millis = properties
                .get("time")
                .and_then(Value::as_i64)
                .ok_or_else(|| FeedParseError::missing("properties.time"))?;
            DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| FeedParseError::invalid("properties.time", "out of range"))?
        };

        Ok(Self {
            latitude,
            longitude,
            magnitude,
            observed_at,
            source_id: properties
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

fn coord_at(coords: &[Value], index: usize, field: &str) -> Result<f64, FeedParseError> {
    let value = coords
        .get(index)
        .ok_or_else(|| FeedParseError::missing(field))?
        .as_f64()
        .ok_or_else(|| FeedParseError::invalid(field, "not a number"))?;
    if !value.is_finite() {
        return Err(FeedParseError::invalid(field, "not finite"));
    }
    Ok(value)
}
