//! Open-Meteo telemetry provider
//!
//! Hourly precipitation and near-surface soil moisture over the trailing
//! `past_days`, summarized as a precipitation total and a moisture mean.

use std::time::Duration;

use async_trait::async_trait;
use hazard_types::collaborators::TelemetryProvider;
use hazard_types::errors::TelemetryError;
use hazard_types::telemetry::TelemetryReading;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const PRECIPITATION_SERIES: &str = "precipitation";
const SOIL_MOISTURE_SERIES: &str = "soil_moisture_0_to_1cm";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenMeteoConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com".to_string(),
            request_timeout_ms: 20_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoTelemetry {
    http_client: reqwest::Client,
    config: OpenMeteoConfig,
}

impl OpenMeteoTelemetry {
    pub fn new(config: OpenMeteoConfig) -> Result<Self, TelemetryError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| TelemetryError::Transport(e.to_string()))?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn forecast_url(&self, lat: f64, lon: f64, lookback_days: u32) -> String {
        format!(
            "{}/v1/forecast?latitude={lat}&longitude={lon}&past_days={lookback_days}\
             &forecast_days=1&hourly={PRECIPITATION_SERIES},{SOIL_MOISTURE_SERIES}",
            self.config.base_url,
        )
    }
}

#[async_trait]
impl TelemetryProvider for OpenMeteoTelemetry {
    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        lookback_days: u32,
    ) -> Result<TelemetryReading, TelemetryError> {
        let url = self.forecast_url(lat, lon, lookback_days);
        let res = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| TelemetryError::Transport(e.to_string()))?;

        if !res.status().is_success() {
            return Err(TelemetryError::Unavailable {
                status: res.status().as_u16(),
            });
        }

        let body: Value = res
            .json()
            .await
            .map_err(|e| TelemetryError::MalformedPayload(e.to_string()))?;
        let reading = summarize_hourly(&body)?;
        debug!(
            lat,
            lon,
            precipitation_mm = reading.precipitation_mm_total,
            soil_moisture = reading.soil_moisture_avg,
            "Telemetry fetched"
        );
        Ok(reading)
    }
}

/// Reduce an Open-Meteo hourly payload to a [`TelemetryReading`].
///
/// Null samples are ignored; a series with no samples at all is malformed.
pub fn summarize_hourly(body: &Value) -> Result<TelemetryReading, TelemetryError> {
    let precipitation = samples(body, PRECIPITATION_SERIES)?;
    let moisture = samples(body, SOIL_MOISTURE_SERIES)?;

    Ok(TelemetryReading {
        precipitation_mm_total: precipitation.iter().sum(),
        soil_moisture_avg: moisture.iter().sum::<f64>() / moisture.len() as f64,
    })
}

fn samples(body: &Value, series: &str) -> Result<Vec<f64>, TelemetryError> {
    let values = body
        .get("hourly")
        .and_then(|h| h.get(series))
        .and_then(Value::as_array)
        .ok_or_else(|| TelemetryError::MalformedPayload(format!("missing hourly.{series}")))?;

    let present: Vec<f64> = values.iter().filter_map(Value::as_f64).collect();
    if present.is_empty() {
        return Err(TelemetryError::MalformedPayload(format!(
            "hourly.{series} has no samples"
        )));
    }
    Ok(present)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forecast_url() {
        let provider = OpenMeteoTelemetry::new(OpenMeteoConfig::default()).unwrap();
        assert_eq!(
            provider.forecast_url(-4.5, 15.1, 3),
            "https://api.open-meteo.com/v1/forecast?latitude=-4.5&longitude=15.1&past_days=3\
             &forecast_days=1&hourly=precipitation,soil_moisture_0_to_1cm"
        );
    }

    #[test]
    fn test_summarize_hourly() {
        let body = json!({
            "hourly": {
                "time": ["t0", "t1", "t2", "t3"],
                "precipitation": [10.0, 15.5, null, 24.5],
                "soil_moisture_0_to_1cm": [0.3, 0.4, 0.35, null]
            }
        });
        let reading = summarize_hourly(&body).unwrap();
        assert!((reading.precipitation_mm_total - 50.0).abs() < 1e-9);
        assert!((reading.soil_moisture_avg - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_missing_series_is_malformed() {
        let body = json!({"hourly": {"precipitation": [1.0]}});
        assert!(matches!(
            summarize_hourly(&body),
            Err(TelemetryError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_all_null_series_is_malformed() {
        let body = json!({
            "hourly": {"precipitation": [null, null], "soil_moisture_0_to_1cm": [0.2]}
        });
        assert!(summarize_hourly(&body).is_err());
    }
}
