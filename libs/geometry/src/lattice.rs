//! Uniform lattice decomposition of a bounding box
//!
//! The lattice origin is the box's minimum corner. Along each axis the
//! number of cells is `floor((max - min) / step) + 1`, so a degenerate
//! box still yields one cell and the last cell may extend past the box.

use geo::{coord, Polygon, Rect};
use hazard_types::errors::GeometryError;
use hazard_types::observation::GeoPoint;
use hazard_types::region::BoundingBox;
use serde::{Deserialize, Serialize};

/// Slack absorbed before flooring so spans that are an exact multiple of
/// the step in decimal (0.5 / 0.1) do not lose a cell to binary rounding.
const AXIS_EPSILON: f64 = 1e-9;

/// One square lattice cell, anchored at its south-west corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub lat: f64,
    pub lon: f64,
    pub size_deg: f64,
}

impl Cell {
    pub fn polygon(&self) -> Polygon<f64> {
        Rect::new(
            coord! { x: self.lon, y: self.lat },
            coord! { x: self.lon + self.size_deg, y: self.lat + self.size_deg },
        )
        .to_polygon()
    }

    /// Point used for telemetry lookups: the lattice point itself.
    pub fn representative_point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Finite, restartable sequence of cells covering a bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    origin_lat: f64,
    origin_lon: f64,
    step: f64,
    rows: usize,
    cols: usize,
}

impl Lattice {
    /// Build the lattice for `bbox` with square cells of `cell_size_deg`.
    ///
    /// Fails fast on a non-positive or non-finite cell size, on an
    /// invalid box, and when the cell count does not fit in `usize`;
    /// no cells are produced in any of these cases.
    pub fn build(bbox: &BoundingBox, cell_size_deg: f64) -> Result<Self, GeometryError> {
        if !cell_size_deg.is_finite() || cell_size_deg <= 0.0 {
            return Err(GeometryError::InvalidCellSize(cell_size_deg));
        }
        bbox.validate()?;

        let overflow = || GeometryError::LatticeOverflow(cell_size_deg);
        let rows = axis_cells(bbox.max_lat - bbox.min_lat, cell_size_deg).ok_or_else(overflow)?;
        let cols = axis_cells(bbox.max_lon - bbox.min_lon, cell_size_deg).ok_or_else(overflow)?;
        rows.checked_mul(cols).ok_or_else(overflow)?;

        Ok(Self {
            origin_lat: bbox.min_lat,
            origin_lon: bbox.min_lon,
            step: cell_size_deg,
            rows,
            cols,
        })
    }

    /// Cells along the latitude axis
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cells along the longitude axis
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total cell count; `build` guarantees the product fits.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(Cell {
            row,
            col,
            lat: self.origin_lat + row as f64 * self.step,
            lon: self.origin_lon + col as f64 * self.step,
            size_deg: self.step,
        })
    }

    /// Row-major iteration; each call starts again from the origin.
    pub fn iter(&self) -> LatticeIter {
        LatticeIter {
            lattice: *self,
            next: 0,
        }
    }
}

impl IntoIterator for &Lattice {
    type Item = Cell;
    type IntoIter = LatticeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct LatticeIter {
    lattice: Lattice,
    next: usize,
}

impl Iterator for LatticeIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.lattice.cols == 0 {
            return None;
        }
        let cell = self
            .lattice
            .cell(self.next / self.lattice.cols, self.next % self.lattice.cols)?;
        self.next += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.lattice.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LatticeIter {}

/// Cell count along one axis, or `None` when it is not representable.
fn axis_cells(span: f64, step: f64) -> Option<usize> {
    let cells = (span / step + AXIS_EPSILON).floor() + 1.0;
    // usize::MAX as f64 rounds up to 2^64 (or 2^32), so strict < keeps the cast exact
    if cells.is_finite() && cells < usize::MAX as f64 {
        Some(cells as usize)
    } else {
        None
    }
}
