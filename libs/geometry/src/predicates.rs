//! Spatial predicates against stored hazard geometries

use geo::{Contains, CoordsIter, Intersects, MultiPolygon, Point, Polygon};
use hazard_types::errors::GeometryError;
use hazard_types::hazard::HazardGeometry;
use hazard_types::observation::GeoPoint;

/// Lift a hazard geometry to a multipolygon and check it is usable.
///
/// A single polygon becomes a one-element multipolygon. Empty shapes,
/// degenerate rings and non-finite coordinates are rejected.
pub fn to_multi_polygon(geometry: &HazardGeometry) -> Result<MultiPolygon<f64>, GeometryError> {
    let multi = match geometry {
        HazardGeometry::Polygon(polygon) => MultiPolygon::new(vec![polygon.clone()]),
        HazardGeometry::MultiPolygon(multi) => multi.clone(),
    };

    if multi.0.is_empty() {
        return Err(malformed("multipolygon has no members"));
    }
    for (index, polygon) in multi.0.iter().enumerate() {
        check_polygon(index, polygon)?;
    }
    Ok(multi)
}

fn check_polygon(index: usize, polygon: &Polygon<f64>) -> Result<(), GeometryError> {
    // closed ring: three distinct vertices plus the repeated first one
    if polygon.exterior().0.len() < 4 {
        return Err(malformed(format!(
            "polygon {index} exterior has {} coordinates",
            polygon.exterior().0.len()
        )));
    }
    if polygon
        .coords_iter()
        .any(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err(malformed(format!("polygon {index} has non-finite coordinates")));
    }
    Ok(())
}

fn malformed(reason: impl Into<String>) -> GeometryError {
    GeometryError::MalformedGeometry {
        reason: reason.into(),
    }
}

/// Whether a lattice cell touches or overlaps a hazard geometry.
pub fn intersects(cell: &Polygon<f64>, hazard: &HazardGeometry) -> Result<bool, GeometryError> {
    let multi = to_multi_polygon(hazard)?;
    Ok(multi.0.iter().any(|member| cell.intersects(member)))
}

/// Whether a point lies strictly inside a hazard geometry.
pub fn within(point: GeoPoint, hazard: &HazardGeometry) -> Result<bool, GeometryError> {
    if !point.is_finite() {
        return Err(malformed("point has non-finite coordinates"));
    }
    let multi = to_multi_polygon(hazard)?;
    let p = Point::new(point.longitude, point.latitude);
    Ok(multi.0.iter().any(|member| member.contains(&p)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{coord, polygon, LineString, Rect};

    fn square(min_x: f64, min_y: f64, size: f64) -> Polygon<f64> {
        Rect::new(
            coord! { x: min_x, y: min_y },
            coord! { x: min_x + size, y: min_y + size },
        )
        .to_polygon()
    }

    #[test]
    fn test_single_polygon_lifted() {
        let geometry = HazardGeometry::Polygon(square(0.0, 0.0, 1.0));
        let multi = to_multi_polygon(&geometry).unwrap();
        assert_eq!(multi.0.len(), 1);
    }

    #[test]
    fn test_polygon_and_multipolygon_agree() {
        let cell = square(0.5, 0.5, 0.1);
        let single = HazardGeometry::Polygon(square(0.0, 0.0, 1.0));
        let multi = HazardGeometry::MultiPolygon(MultiPolygon::new(vec![square(0.0, 0.0, 1.0)]));
        assert_eq!(intersects(&cell, &single), intersects(&cell, &multi));
        assert!(intersects(&cell, &single).unwrap());
    }

    #[test]
    fn test_disjoint_cell() {
        let cell = square(5.0, 5.0, 0.1);
        let hazard = HazardGeometry::Polygon(square(0.0, 0.0, 1.0));
        assert!(!intersects(&cell, &hazard).unwrap());
    }

    #[test]
    fn test_any_member_of_multipolygon_matches() {
        let cell = square(10.05, 10.05, 0.1);
        let hazard = HazardGeometry::MultiPolygon(MultiPolygon::new(vec![
            square(0.0, 0.0, 1.0),
            square(10.0, 10.0, 1.0),
        ]));
        assert!(intersects(&cell, &hazard).unwrap());
    }

    #[test]
    fn test_within() {
        let hazard: HazardGeometry = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ]
        .into();
        assert!(within(GeoPoint::new(1.0, 1.0), &hazard).unwrap());
        assert!(!within(GeoPoint::new(3.0, 1.0), &hazard).unwrap());
    }

    #[test]
    fn test_malformed_geometry_rejected() {
        let empty = HazardGeometry::MultiPolygon(MultiPolygon::new(vec![]));
        assert!(matches!(
            to_multi_polygon(&empty),
            Err(GeometryError::MalformedGeometry { .. })
        ));

        let degenerate = HazardGeometry::Polygon(Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]),
            vec![],
        ));
        assert!(intersects(&square(0.0, 0.0, 1.0), &degenerate).is_err());

        let nan: HazardGeometry = polygon![
            (x: f64::NAN, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 1.0),
            (x: 0.0, y: 1.0),
        ]
        .into();
        assert!(within(GeoPoint::new(0.5, 0.5), &nan).is_err());
    }
}
