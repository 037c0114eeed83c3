//! Error types shared across the hazard engines
//!
//! Three families, mirroring how failures are handled:
//! input validation (fail fast), collaborator unavailability, and
//! data-shape problems in individual payloads.

use thiserror::Error;

/// Geometry and input-validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Invalid cell size: {0} (must be a positive finite number of degrees)")]
    InvalidCellSize(f64),

    #[error("Invalid bounding box: {reason}")]
    InvalidBoundingBox { reason: String },

    #[error("Malformed geometry: {reason}")]
    MalformedGeometry { reason: String },

    #[error("Cell size {0} yields more lattice cells than can be addressed")]
    LatticeOverflow(f64),

    #[error("Invalid lookback: {days} days is outside the representable time range")]
    InvalidLookback { days: u32 },
}

/// Failures reaching or reading the secondary event catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Catalog unavailable: HTTP status {status}")]
    Unavailable { status: u16 },

    #[error("Catalog transport error: {0}")]
    Transport(String),

    #[error("Malformed catalog response: {0}")]
    MalformedResponse(String),
}

/// Failures querying the hazard record store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Hazard store unavailable: {0}")]
    Unavailable(String),

    #[error("Hazard store query failed: {0}")]
    Query(String),
}

/// Failures fetching live telemetry for a point
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TelemetryError {
    #[error("Telemetry unavailable: HTTP status {status}")]
    Unavailable { status: u16 },

    #[error("Telemetry transport error: {0}")]
    Transport(String),

    #[error("Malformed telemetry payload: {0}")]
    MalformedPayload(String),
}

/// A single feed record could not be read
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedParseError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

impl FeedParseError {
    pub fn missing(field: &str) -> Self {
        Self::MissingField(field.to_string())
    }

    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_cell_size_display() {
        let err = GeometryError::InvalidCellSize(-0.1);
        assert!(err.to_string().contains("-0.1"));
    }

    #[test]
    fn test_lattice_overflow_display() {
        let err = GeometryError::LatticeOverflow(1e-12);
        assert!(err.to_string().contains("1e-12"));
    }

    #[test]
    fn test_catalog_unavailable_display() {
        let err = CatalogError::Unavailable { status: 503 };
        assert_eq!(err.to_string(), "Catalog unavailable: HTTP status 503");
    }

    #[test]
    fn test_feed_parse_error_helpers() {
        assert_eq!(
            FeedParseError::missing("geometry").to_string(),
            "Missing field: geometry"
        );
        let err = FeedParseError::invalid("severity", "not a number");
        assert!(matches!(err, FeedParseError::InvalidField { .. }));
        assert!(err.to_string().contains("severity"));
    }
}
