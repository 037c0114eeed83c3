//! Property tests for lattice decomposition and geodesic distance

use geometry::{distance_km, Lattice};
use hazard_types::observation::GeoPoint;
use hazard_types::region::BoundingBox;
use proptest::prelude::*;

// Dyadic steps keep box spans exactly representable, so the expected
// count can be computed with a plain floor.
fn dyadic_step() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.125), Just(0.25), Just(0.5), Just(1.0), Just(2.0)]
}

proptest! {
    #[test]
    fn prop_degenerate_box_is_one_cell(
        lat in -90.0f64..=90.0,
        lon in -180.0f64..=180.0,
        step in 0.001f64..5.0,
    ) {
        let bbox = BoundingBox::new(lat, lat, lon, lon);
        let lattice = Lattice::build(&bbox, step).unwrap();
        prop_assert_eq!(lattice.iter().count(), 1);
    }

    #[test]
    fn prop_cell_count_matches_floor_formula(
        step in dyadic_step(),
        lat_origin in -40i32..40,
        lon_origin in -80i32..80,
        lat_extra in 0u32..24,
        lon_extra in 0u32..24,
        lat_frac in 0u32..4,
        lon_frac in 0u32..4,
    ) {
        let min_lat = lat_origin as f64;
        let min_lon = lon_origin as f64;
        let max_lat = min_lat + lat_extra as f64 * step + lat_frac as f64 * step / 4.0;
        let max_lon = min_lon + lon_extra as f64 * step + lon_frac as f64 * step / 4.0;
        let bbox = BoundingBox::new(min_lat, max_lat, min_lon, max_lon);

        let lattice = Lattice::build(&bbox, step).unwrap();
        let expected_rows = ((max_lat - min_lat) / step).floor() as usize + 1;
        let expected_cols = ((max_lon - min_lon) / step).floor() as usize + 1;

        prop_assert_eq!(lattice.iter().count(), expected_rows * expected_cols);
        prop_assert_eq!(lattice.len(), expected_rows * expected_cols);
    }

    #[test]
    fn prop_cells_start_inside_box(
        min_lat in -60.0f64..60.0,
        min_lon in -170.0f64..170.0,
        span in 0.0f64..3.0,
        step in 0.05f64..1.0,
    ) {
        let bbox = BoundingBox::new(min_lat, min_lat + span, min_lon, min_lon + span);
        let lattice = Lattice::build(&bbox, step).unwrap();
        for cell in &lattice {
            prop_assert!(cell.lat >= bbox.min_lat && cell.lat <= bbox.max_lat + 1e-6);
            prop_assert!(cell.lon >= bbox.min_lon && cell.lon <= bbox.max_lon + 1e-6);
        }
    }

    #[test]
    fn prop_distance_to_self_is_zero(
        lat in -89.0f64..89.0,
        lon in -179.0f64..179.0,
    ) {
        let p = GeoPoint::new(lat, lon);
        prop_assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn prop_distance_is_symmetric(
        lat_a in -80.0f64..80.0,
        lon_a in -170.0f64..170.0,
        lat_b in -80.0f64..80.0,
        lon_b in -170.0f64..170.0,
    ) {
        let a = GeoPoint::new(lat_a, lon_a);
        let b = GeoPoint::new(lat_b, lon_b);
        let ab = distance_km(a, b);
        let ba = distance_km(b, a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() < 1e-6, "ab={} ba={}", ab, ba);
    }
}
