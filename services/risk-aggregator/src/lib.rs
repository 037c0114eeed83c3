//! Regional Risk Aggregation Service
//!
//! Produces one composite hazard-risk score for a bounding region by
//! fusing stored hazard records with live environmental telemetry.
//!
//! # Architecture
//!
//! ```text
//! BoundingBox
//!     │
//! ┌───▼─────┐
//! │ Lattice │  ← uniform cells from the box's minimum corner
//! └───┬─────┘
//!     │ bounded fan-out (semaphore), optional deadline
//! ┌───▼──────────────────────────┐
//! │ Cell evaluation              │
//! │  HazardStore  → hazard score │
//! │  Telemetry    → precip/moist │
//! └───┬──────────────────────────┘
//!     │ Scored | Failed
//! ┌───▼─────┐
//! │ Reduce  │  ← mean over scored cells only
//! └───┬─────┘
//!     ▼
//! RegionRiskResult
//! ```

pub mod config;
pub mod scoring;
pub mod store;
pub mod telemetry;
pub mod engine;

pub use config::{RiskModelConfig, SeverityWeights};
pub use engine::{AssessmentError, AssessmentRequest, CellFailure, CellOutcome, GridRiskAggregator};
pub use store::InMemoryHazardStore;
pub use telemetry::{OpenMeteoConfig, OpenMeteoTelemetry};

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
