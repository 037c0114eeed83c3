//! Event Correlation Service
//!
//! Recognizes when a seismic event reported by one catalog is the same
//! physical event as a record in a second, independently keyed catalog.
//!
//! # Flow
//!
//! ```text
//! Observation
//!     │
//! ┌───▼──────────┐
//! │ Time window  │  ← observed_at ± search window
//! └───┬──────────┘
//!     │ one bulk fetch (deadline-bounded)
//! ┌───▼──────────┐
//! │ EventCatalog │
//! └───┬──────────┘
//!     │ raw candidates, feed order
//! ┌───▼──────────┐
//! │ Scan         │  ← parse, distance, severity delta
//! └───┬──────────┘
//!     ▼
//! MatchResult | None
//! ```

pub mod config;
pub mod catalog;
pub mod engine;

pub use catalog::{GdacsCatalog, GdacsConfig};
pub use config::{CorrelatorConfig, MatchPolicy};
pub use engine::{select_match, CorrelationError, EventCorrelator};

// Library version
pub const SERVICE_VERSION: &str = "0.1.0";
