//! Types library for hazard correlation and regional risk scoring
//!
//! This library provides the data model shared by the correlation and
//! aggregation engines, the collaborator contracts they consume, and the
//! error taxonomy used across the workspace.
//!
//! # Modules
//! - `hazard`: Hazard categories, severity levels, stored hazard records
//! - `observation`: Seismic observations submitted for correlation
//! - `candidate`: Secondary-catalog candidates and match results
//! - `region`: Bounding boxes, risk cells and region results
//! - `telemetry`: Live environmental telemetry readings
//! - `feature`: GeoJSON-like feature output
//! - `collaborators`: Storage, catalog and telemetry contracts
//! - `errors`: Error taxonomy

pub mod hazard;
pub mod observation;
pub mod candidate;
pub mod region;
pub mod telemetry;
pub mod feature;
pub mod collaborators;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::hazard::*;
    pub use crate::observation::*;
    pub use crate::candidate::*;
    pub use crate::region::*;
    pub use crate::telemetry::*;
    pub use crate::feature::*;
    pub use crate::collaborators::*;
    pub use crate::errors::*;
}
