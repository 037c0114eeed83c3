//! Geodesic distance on the WGS84 ellipsoid

use geo::{GeodesicDistance, Point};
use hazard_types::observation::GeoPoint;

/// Distance between two positions in kilometres (Karney geodesic on
/// WGS84). Coincident positions are exactly zero apart.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }
    let pa = Point::new(a.longitude, a.latitude);
    let pb = Point::new(b.longitude, b.latitude);
    pa.geodesic_distance(&pb) / 1000.0
}
