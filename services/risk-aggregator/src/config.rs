//! Risk model configuration
//!
//! Weights and normalization thresholds are fixed per aggregator
//! instance; tests substitute alternatives through `with_config`.

use hazard_types::hazard::SeverityLevel;
use serde::{Deserialize, Serialize};

/// Weight contributed by one hazard record of each severity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityWeights {
    pub low: f64,
    pub moderate: f64,
    pub severe: f64,
    pub extreme: f64,
}

impl SeverityWeights {
    pub fn weight(&self, level: SeverityLevel) -> f64 {
        match level {
            SeverityLevel::Low => self.low,
            SeverityLevel::Moderate => self.moderate,
            SeverityLevel::Severe => self.severe,
            SeverityLevel::Extreme => self.extreme,
        }
    }
}

impl Default for SeverityWeights {
    fn default() -> Self {
        Self {
            low: 0.25,
            moderate: 0.5,
            severe: 0.75,
            extreme: 1.0,
        }
    }
}

/// Composite risk model and execution limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskModelConfig {
    pub severity_weights: SeverityWeights,
    /// Share of the composite taken by stored hazard density
    pub hazard_weight: f64,
    /// Share of the composite taken by precipitation
    pub precip_weight: f64,
    /// Share of the composite taken by soil moisture
    pub moisture_weight: f64,
    /// Precipitation total that saturates the precipitation score (mm)
    pub precip_saturation_mm: f64,
    /// Soil moisture that saturates the moisture score (m³/m³)
    pub moisture_saturation_m3: f64,
    /// Cells evaluated concurrently within one assessment
    pub max_concurrency: usize,
    /// Largest lattice accepted for one assessment
    pub max_cells: usize,
}

impl Default for RiskModelConfig {
    fn default() -> Self {
        Self {
            severity_weights: SeverityWeights::default(),
            hazard_weight: 0.6,
            precip_weight: 0.2,
            moisture_weight: 0.2,
            precip_saturation_mm: 100.0,
            moisture_saturation_m3: 0.7,
            max_concurrency: 8,
            max_cells: 10_000,
        }
    }
}
