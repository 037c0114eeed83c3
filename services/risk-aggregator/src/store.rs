//! In-memory hazard store
//!
//! A read-only [`HazardStore`] over a fixed set of records, for embedding
//! and tests. Filtering uses the same intersection predicate the engines
//! rely on elsewhere.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use geo::Polygon;
use hazard_types::collaborators::HazardStore;
use hazard_types::errors::StoreError;
use hazard_types::hazard::{HazardCategory, HazardRecord};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct InMemoryHazardStore {
    records: Vec<HazardRecord>,
}

impl InMemoryHazardStore {
    pub fn new(records: Vec<HazardRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl HazardStore for InMemoryHazardStore {
    async fn query_intersecting(
        &self,
        category: HazardCategory,
        area: &Polygon<f64>,
        since: DateTime<Utc>,
    ) -> Result<Vec<HazardRecord>, StoreError> {
        let mut matched = Vec::new();
        for (index, record) in self.records.iter().enumerate() {
            if record.category != category || record.reported_at < since {
                continue;
            }
            match geometry::intersects(area, &record.affected_area) {
                Ok(true) => matched.push(record.clone()),
                Ok(false) => {}
                Err(e) => {
                    warn!(index, error = %e, "Record with unusable geometry in query area");
                    return Err(StoreError::Query(format!("record {index}: {e}")));
                }
            }
        }
        Ok(matched)
    }
}
