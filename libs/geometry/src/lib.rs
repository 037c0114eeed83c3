//! Geometry adapter
//!
//! Point and polygon arithmetic shared by the correlation and aggregation
//! engines:
//! - `distance`: geodesic distance between two positions
//! - `lattice`: uniform decomposition of a bounding box into square cells
//! - `predicates`: intersection and containment against hazard geometries
//!
//! Hazard geometries are always lifted to a multipolygon before testing,
//! so callers never branch on single versus multi shapes.

pub mod distance;
pub mod lattice;
pub mod predicates;

pub use distance::distance_km;
pub use lattice::{Cell, Lattice};
pub use predicates::{intersects, to_multi_polygon, within};
