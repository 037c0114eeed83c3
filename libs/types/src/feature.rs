//! GeoJSON-like feature output
//!
//! Results leave the engines as `{type: "Feature", geometry, properties}`
//! records for whatever presentation layer sits on top.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::observation::GeoPoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Value,
    pub properties: Value,
}

impl Feature {
    pub fn new(geometry: Value, properties: Value) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry,
            properties,
        }
    }

    /// Point feature; GeoJSON positions are `[lon, lat]`.
    pub fn point(position: GeoPoint, properties: Value) -> Self {
        Self::new(
            json!({
                "type": "Point",
                "coordinates": [position.longitude, position.latitude],
            }),
            properties,
        )
    }

    /// Polygon feature from a single closed exterior ring of `[lon, lat]` pairs.
    pub fn polygon(ring: Vec<[f64; 2]>, properties: Value) -> Self {
        Self::new(
            json!({
                "type": "Polygon",
                "coordinates": [ring],
            }),
            properties,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_feature_shape() {
        let feature = Feature::point(GeoPoint::new(34.0, -118.0), json!({"k": 1}));
        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "Point");
        assert_eq!(value["geometry"]["coordinates"][0], -118.0);
        assert_eq!(value["properties"]["k"], 1);
    }
}
