//! Live environmental telemetry

use serde::{Deserialize, Serialize};

/// Telemetry summary for one point over a lookback window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryReading {
    /// Total precipitation over the window (mm)
    pub precipitation_mm_total: f64,
    /// Mean volumetric soil moisture over the window (m³/m³)
    pub soil_moisture_avg: f64,
}

impl TelemetryReading {
    pub fn new(precipitation_mm_total: f64, soil_moisture_avg: f64) -> Self {
        Self {
            precipitation_mm_total,
            soil_moisture_avg,
        }
    }
}
