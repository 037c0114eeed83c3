//! Grid risk aggregator
//!
//! Decomposes a bounding box into lattice cells, scores every cell from
//! stored hazard density and live telemetry with bounded concurrency, and
//! reduces the surviving cells to one region-level mean.
//!
//! A cell that cannot be scored is dropped from both numerator and
//! denominator; it never aborts the assessment.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use geometry::{Cell, Lattice};
use hazard_types::collaborators::{HazardStore, TelemetryProvider};
use hazard_types::errors::{GeometryError, StoreError, TelemetryError};
use hazard_types::hazard::HazardCategory;
use hazard_types::region::{BoundingBox, RegionRiskResult, RiskCell};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::RiskModelConfig;
use crate::scoring;

/// Request-level failures. Everything else degrades to dropped cells.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssessmentError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] GeometryError),

    #[error("Lattice too large: {cells} cells exceeds limit {limit}")]
    LatticeTooLarge { cells: usize, limit: usize },
}

/// Why a single cell was dropped
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellFailure {
    #[error("hazard store: {0}")]
    Store(#[from] StoreError),

    #[error("telemetry: {0}")]
    Telemetry(#[from] TelemetryError),

    #[error("abandoned at deadline")]
    DeadlineExpired,

    #[error("evaluation task failed: {0}")]
    TaskFailed(String),
}

/// Result of evaluating one lattice cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    Scored { cell: Cell, risk: RiskCell },
    Failed { cell: Cell, reason: CellFailure },
}

impl CellOutcome {
    pub fn cell(&self) -> &Cell {
        match self {
            CellOutcome::Scored { cell, .. } | CellOutcome::Failed { cell, .. } => cell,
        }
    }
}

/// Parameters for one region assessment
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRequest {
    pub bbox: BoundingBox,
    pub category: HazardCategory,
    pub cell_size_deg: f64,
    pub lookback_days: u32,
    /// Cells still running at this instant are abandoned
    pub deadline: Option<Instant>,
    /// Return per-cell scores alongside the mean
    pub include_cells: bool,
    /// Reference time for the lookback window; defaults to now
    pub as_of: Option<DateTime<Utc>>,
}

impl AssessmentRequest {
    /// Flood assessment with 0.1° cells over a three-day lookback
    pub fn new(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            category: HazardCategory::Flood,
            cell_size_deg: 0.1,
            lookback_days: 3,
            deadline: None,
            include_cells: false,
            as_of: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }
}

/// Stateless region scorer over shared collaborators
#[derive(Clone)]
pub struct GridRiskAggregator {
    store: Arc<dyn HazardStore>,
    telemetry: Arc<dyn TelemetryProvider>,
    config: Arc<RiskModelConfig>,
}

impl GridRiskAggregator {
    /// Create an aggregator with the default risk model
    pub fn new(store: Arc<dyn HazardStore>, telemetry: Arc<dyn TelemetryProvider>) -> Self {
        Self::with_config(store, telemetry, RiskModelConfig::default())
    }

    /// Create an aggregator with a custom risk model
    pub fn with_config(
        store: Arc<dyn HazardStore>,
        telemetry: Arc<dyn TelemetryProvider>,
        config: RiskModelConfig,
    ) -> Self {
        Self {
            store,
            telemetry,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &RiskModelConfig {
        &self.config
    }

    /// Assess composite risk for a bounding region.
    ///
    /// Input problems fail before any cell is evaluated. Once evaluation
    /// starts the call always returns a result, partial if cells failed
    /// or the deadline passed.
    pub async fn assess_region(
        &self,
        request: AssessmentRequest,
    ) -> Result<RegionRiskResult, AssessmentError> {
        let lattice = Lattice::build(&request.bbox, request.cell_size_deg)?;
        if lattice.len() > self.config.max_cells {
            return Err(AssessmentError::LatticeTooLarge {
                cells: lattice.len(),
                limit: self.config.max_cells,
            });
        }

        let assessment_id = Uuid::now_v7();
        let as_of = request.as_of.unwrap_or_else(Utc::now);
        let since = chrono::Duration::try_days(i64::from(request.lookback_days))
            .and_then(|lookback| as_of.checked_sub_signed(lookback))
            .ok_or(GeometryError::InvalidLookback {
                days: request.lookback_days,
            })?;

        info!(
            %assessment_id,
            category = %request.category,
            cells = lattice.len(),
            rows = lattice.rows(),
            cols = lattice.cols(),
            cell_size_deg = request.cell_size_deg,
            lookback_days = request.lookback_days,
            "Region assessment started"
        );

        let outcomes = self
            .evaluate_lattice(&lattice, &request, since, assessment_id)
            .await;
        let result = reduce(
            assessment_id,
            request.bbox,
            as_of,
            outcomes,
            request.include_cells,
        );

        info!(
            %assessment_id,
            average_risk = result.average_risk,
            cells_evaluated = result.cells_evaluated,
            cells_failed = result.cells_failed,
            "Region assessment finished"
        );
        Ok(result)
    }

    async fn evaluate_lattice(
        &self,
        lattice: &Lattice,
        request: &AssessmentRequest,
        since: DateTime<Utc>,
        assessment_id: Uuid,
    ) -> Vec<CellOutcome> {
        let permits = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for cell in lattice {
            let permits = Arc::clone(&permits);
            let store = Arc::clone(&self.store);
            let telemetry = Arc::clone(&self.telemetry);
            let config = Arc::clone(&self.config);
            let category = request.category;
            let lookback_days = request.lookback_days;

            tasks.spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return CellOutcome::Failed {
                            cell,
                            reason: CellFailure::TaskFailed(e.to_string()),
                        }
                    }
                };
                evaluate_cell(
                    cell,
                    store.as_ref(),
                    telemetry.as_ref(),
                    &config,
                    category,
                    since,
                    lookback_days,
                )
                .await
            });
        }

        let mut outcomes = Vec::with_capacity(lattice.len());
        let mut deadline_hit = false;
        loop {
            let joined = match request.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        warn!(
                            %assessment_id,
                            abandoned = tasks.len(),
                            "Deadline reached, abandoning in-flight cells"
                        );
                        tasks.abort_all();
                        deadline_hit = true;
                        break;
                    }
                },
                None => tasks.join_next().await,
            };

            match joined {
                Some(Ok(outcome)) => {
                    if let CellOutcome::Failed { cell, reason } = &outcome {
                        warn!(
                            %assessment_id,
                            lat = cell.lat,
                            lon = cell.lon,
                            error = %reason,
                            "Cell dropped"
                        );
                    }
                    outcomes.push(outcome);
                }
                Some(Err(e)) => warn!(%assessment_id, error = %e, "Cell task failed"),
                None => break,
            }
        }

        // Cells that never reported back are dropped too
        if outcomes.len() < lattice.len() {
            let mut seen = vec![false; lattice.len()];
            for outcome in &outcomes {
                let c = outcome.cell();
                seen[c.row * lattice.cols() + c.col] = true;
            }
            for (cell, _) in lattice.iter().zip(seen).filter(|(_, reported)| !reported) {
                let reason = if deadline_hit {
                    CellFailure::DeadlineExpired
                } else {
                    CellFailure::TaskFailed("evaluation task did not complete".to_string())
                };
                outcomes.push(CellOutcome::Failed { cell, reason });
            }
        }

        outcomes
    }
}

/// Score one cell. Every collaborator failure is folded into the outcome.
pub async fn evaluate_cell(
    cell: Cell,
    store: &dyn HazardStore,
    telemetry: &dyn TelemetryProvider,
    config: &RiskModelConfig,
    category: HazardCategory,
    since: DateTime<Utc>,
    lookback_days: u32,
) -> CellOutcome {
    match score(cell, store, telemetry, config, category, since, lookback_days).await {
        Ok(risk) => {
            debug!(
                lat = cell.lat,
                lon = cell.lon,
                hazard_score = risk.hazard_score,
                composite = risk.composite,
                "Cell scored"
            );
            CellOutcome::Scored { cell, risk }
        }
        Err(reason) => CellOutcome::Failed { cell, reason },
    }
}

async fn score(
    cell: Cell,
    store: &dyn HazardStore,
    telemetry: &dyn TelemetryProvider,
    config: &RiskModelConfig,
    category: HazardCategory,
    since: DateTime<Utc>,
    lookback_days: u32,
) -> Result<RiskCell, CellFailure> {
    let records = store
        .query_intersecting(category, &cell.polygon(), since)
        .await?;
    let hazard_score = scoring::hazard_score(&records, &config.severity_weights);

    let point = cell.representative_point();
    let reading = telemetry
        .fetch(point.latitude, point.longitude, lookback_days)
        .await?;

    scoring::score_cell(
        point.latitude,
        point.longitude,
        hazard_score,
        &reading,
        config,
    )
    .map_err(CellFailure::from)
}

/// Collapse cell outcomes into the region result.
///
/// Scored cells are summed in lattice order so the mean does not depend
/// on completion order.
pub fn reduce(
    assessment_id: Uuid,
    bbox: BoundingBox,
    as_of: DateTime<Utc>,
    outcomes: Vec<CellOutcome>,
    include_cells: bool,
) -> RegionRiskResult {
    let cells_failed = outcomes
        .iter()
        .filter(|o| matches!(o, CellOutcome::Failed { .. }))
        .count();

    let mut scored: Vec<(Cell, RiskCell)> = outcomes
        .into_iter()
        .filter_map(|o| match o {
            CellOutcome::Scored { cell, risk } => Some((cell, risk)),
            CellOutcome::Failed { .. } => None,
        })
        .collect();
    scored.sort_by_key(|(cell, _)| (cell.row, cell.col));

    let cells_evaluated = scored.len();
    let average_risk = if cells_evaluated == 0 {
        0.0
    } else {
        scored.iter().map(|(_, r)| r.composite).sum::<f64>() / cells_evaluated as f64
    };

    RegionRiskResult {
        assessment_id,
        bounding_box: bbox,
        average_risk,
        cells_evaluated,
        cells_failed,
        as_of,
        cells: include_cells.then(|| scored.into_iter().map(|(_, r)| r).collect()),
    }
}
