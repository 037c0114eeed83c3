//! Secondary-catalog candidates and correlation results

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::FeedParseError;
use crate::feature::Feature;
use crate::observation::GeoPoint;

/// Closed time interval `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Symmetric window of `days` on either side of `center`.
    ///
    /// `None` when either bound falls outside chrono's representable range.
    pub fn around(center: DateTime<Utc>, days: i64) -> Option<Self> {
        let half = Duration::try_days(days)?;
        Some(Self {
            start: center.checked_sub_signed(half)?,
            end: center.checked_add_signed(half)?,
        })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// A raw record as returned by the secondary catalog.
///
/// Kept unparsed until the scan reaches it so one malformed entry never
/// spoils the rest of the batch.
pub type RawCandidate = Value;

/// An event from the secondary catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateEvent {
    pub external_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub severity: f64,
    pub report_url: String,
    pub raw_payload: Value,
}

impl CandidateEvent {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Parse a GDACS event-list feature.
    ///
    /// Reads `geometry.coordinates` (`[lon, lat]`),
    /// `properties.severitydata.severity` and `properties.url.report`;
    /// `external_id` is the event type followed by the event id, either of
    /// which may be absent.
    pub fn from_gdacs_feature(raw: &RawCandidate) -> Result<Self, FeedParseError> {
        let coords = raw
            .pointer("/geometry/coordinates")
            .and_then(Value::as_array)
            .ok_or_else(|| FeedParseError::missing("geometry.coordinates"))?;
        let longitude = finite_number(coords.first(), "geometry.coordinates[0]")?;
        let latitude = finite_number(coords.get(1), "geometry.coordinates[1]")?;
        let severity = finite_number(
            raw.pointer("/properties/severitydata/severity"),
            "properties.severitydata.severity",
        )?;
        let report_url = raw
            .pointer("/properties/url/report")
            .and_then(Value::as_str)
            .ok_or_else(|| FeedParseError::missing("properties.url.report"))?
            .to_string();

        let event_type = raw
            .pointer("/properties/eventtype")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let event_id = match raw.pointer("/properties/eventid") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };

        Ok(Self {
            external_id: format!("{event_type}{event_id}"),
            latitude,
            longitude,
            severity,
            report_url,
            raw_payload: raw.clone(),
        })
    }
}

fn finite_number(value: Option<&Value>, field: &str) -> Result<f64, FeedParseError> {
    let value = value.ok_or_else(|| FeedParseError::missing(field))?;
    let number = value
        .as_f64()
        .ok_or_else(|| FeedParseError::invalid(field, format!("expected number, got {value}")))?;
    if !number.is_finite() {
        return Err(FeedParseError::invalid(field, "not finite"));
    }
    Ok(number)
}

/// Accepted correlation between an observation and a catalog candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: CandidateEvent,
    pub distance_km: f64,
    pub severity_delta: f64,
    pub report_url: String,
}

impl MatchResult {
    pub fn to_feature(&self) -> Feature {
        Feature::point(
            self.matched.position(),
            json!({
                "external_id": self.matched.external_id,
                "severity": self.matched.severity,
                "distance_km": self.distance_km,
                "severity_delta": self.severity_delta,
                "report_url": self.report_url,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn gdacs_feature() -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-118.24, 34.06]},
            "properties": {
                "eventtype": "EQ",
                "eventid": 1400123,
                "severitydata": {"severity": 5.4, "severitytext": "Magnitude 5.4M"},
                "url": {"report": "https://www.gdacs.org/report.aspx?eventid=1400123&eventtype=EQ"}
            }
        })
    }

    #[test]
    fn test_time_range_around() {
        let center = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let range = TimeRange::around(center, 1).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
        assert!(range.contains(center));
        assert!(!range.contains(range.end + Duration::seconds(1)));
    }

    #[test]
    fn test_time_range_around_out_of_range() {
        let center = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert!(TimeRange::around(center, 200_000_000).is_none());
        assert!(TimeRange::around(center, i64::MAX).is_none());
    }

    #[test]
    fn test_parse_gdacs_feature() {
        let candidate = CandidateEvent::from_gdacs_feature(&gdacs_feature()).unwrap();
        assert_eq!(candidate.external_id, "EQ1400123");
        assert_eq!(candidate.latitude, 34.06);
        assert_eq!(candidate.longitude, -118.24);
        assert_eq!(candidate.severity, 5.4);
        assert!(candidate.report_url.contains("eventid=1400123"));
        assert_eq!(candidate.raw_payload, gdacs_feature());
    }

    #[test]
    fn test_parse_gdacs_feature_missing_severity() {
        let mut raw = gdacs_feature();
        raw["properties"]["severitydata"] = json!({});
        let err = CandidateEvent::from_gdacs_feature(&raw).unwrap_err();
        assert_eq!(err, FeedParseError::missing("properties.severitydata.severity"));
    }

    #[test]
    fn test_parse_gdacs_feature_without_event_id() {
        let mut raw = gdacs_feature();
        raw["properties"].as_object_mut().unwrap().remove("eventid");
        let candidate = CandidateEvent::from_gdacs_feature(&raw).unwrap();
        assert_eq!(candidate.external_id, "EQ");
        assert_eq!(candidate.severity, 5.4);
    }

    #[test]
    fn test_parse_gdacs_feature_non_numeric_coordinate() {
        let mut raw = gdacs_feature();
        raw["geometry"]["coordinates"] = json!(["west", 34.06]);
        assert!(matches!(
            CandidateEvent::from_gdacs_feature(&raw),
            Err(FeedParseError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_match_result_feature() {
        let candidate = CandidateEvent::from_gdacs_feature(&gdacs_feature()).unwrap();
        let result = MatchResult {
            report_url: candidate.report_url.clone(),
            matched: candidate,
            distance_km: 1.4,
            severity_delta: 0.2,
        };
        let feature = result.to_feature();
        assert_eq!(feature.kind, "Feature");
        assert_eq!(feature.properties["external_id"], "EQ1400123");
        assert_eq!(feature.geometry["coordinates"][1], 34.06);
    }
}
