//! Per-cell scoring
//!
//! Pure functions from hazard records and telemetry to a [`RiskCell`].

use hazard_types::errors::TelemetryError;
use hazard_types::hazard::HazardRecord;
use hazard_types::region::RiskCell;
use hazard_types::telemetry::TelemetryReading;

use crate::config::{RiskModelConfig, SeverityWeights};

/// Mean severity weight of the matched records; zero when none matched.
pub fn hazard_score(records: &[HazardRecord], weights: &SeverityWeights) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: f64 = records
        .iter()
        .map(|r| weights.weight(r.severity_level))
        .sum();
    total / records.len() as f64
}

/// `value / saturation`, clamped to `[0, 1]`
pub fn saturating_score(value: f64, saturation: f64) -> f64 {
    (value / saturation).clamp(0.0, 1.0)
}

/// Combine the three signals for one lattice point.
///
/// Non-finite telemetry is a data-shape failure for the cell.
pub fn score_cell(
    lat: f64,
    lon: f64,
    hazard_score: f64,
    reading: &TelemetryReading,
    config: &RiskModelConfig,
) -> Result<RiskCell, TelemetryError> {
    if !reading.precipitation_mm_total.is_finite() || !reading.soil_moisture_avg.is_finite() {
        return Err(TelemetryError::MalformedPayload(format!(
            "non-finite reading at ({lat}, {lon}): {reading:?}"
        )));
    }

    let precip_score = saturating_score(reading.precipitation_mm_total, config.precip_saturation_mm);
    let moisture_score = saturating_score(reading.soil_moisture_avg, config.moisture_saturation_m3);
    let composite = config.hazard_weight * hazard_score
        + config.precip_weight * precip_score
        + config.moisture_weight * moisture_score;

    Ok(RiskCell {
        lat,
        lon,
        hazard_score,
        precip_score,
        moisture_score,
        composite,
    })
}
