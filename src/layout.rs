//! Mapping between integer grid cells and world (pixel) coordinates.
//!
//! The pathfinder never needs this; it exists so hosts can draw cells and turn mouse positions
//! back into cells using the same geometry.
use glam::Vec2;
use grid_util::point::Point;
use itertools::iproduct;

use crate::error::{PathfinderError, Result};

/// Slack used when snapping an unprojected coordinate that lands a hair below an integer.
const SNAP_EPSILON: f32 = 1e-4;

/// Common anchors, expressed as a fraction of the grid's total extent.
pub struct Anchor;

impl Anchor {
    /// Cell (0, 0) starts at the origin.
    pub const TOP_LEFT: Vec2 = Vec2::new(0.0, 0.0);
    /// The grid is centred on the origin.
    pub const CENTER: Vec2 = Vec2::new(-0.5, -0.5);
}

/// Packs a cell into `row * cols + col`, or [None] if it lies outside `cols x rows`.
pub(crate) fn cell_index(cell: &Point, cols: usize, rows: usize) -> Option<usize> {
    if cell.x < 0 || cell.y < 0 {
        return None;
    }
    let (col, row) = (cell.x as usize, cell.y as usize);
    (col < cols && row < rows).then(|| row * cols + col)
}

/// Projects cells of a `cols x rows` grid into world space:
/// `world = origin + extent * anchor + cell * cell_size`.
///
/// Dimensions and cell size are fixed at construction, where they are validated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    cols: usize,
    rows: usize,
    cell_size: Vec2,
    pub origin: Vec2,
    pub anchor: Vec2,
}

impl GridLayout {
    /// Creates a top-left anchored layout at the world origin.
    pub fn new(cols: usize, rows: usize, cell_size: Vec2) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(PathfinderError::InvalidLayout(format!(
                "grid must have at least one cell, got {cols}x{rows}"
            )));
        }
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(cell_size.x) || !valid(cell_size.y) {
            return Err(PathfinderError::InvalidLayout(format!(
                "cell size must be positive, got {cell_size}"
            )));
        }
        Ok(GridLayout {
            cols,
            rows,
            cell_size,
            origin: Vec2::ZERO,
            anchor: Anchor::TOP_LEFT,
        })
    }
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }
    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Total size of the grid in world units.
    pub fn extent(&self) -> Vec2 {
        Vec2::new(self.cols as f32, self.rows as f32) * self.cell_size
    }
    fn corner(&self) -> Vec2 {
        self.origin + self.extent() * self.anchor
    }

    pub fn project(&self, cell: &Point) -> Vec2 {
        self.corner() + Vec2::new(cell.x as f32, cell.y as f32) * self.cell_size
    }
    /// Inverse of [project](Self::project). The result is fractional; see
    /// [cell_at](Self::cell_at) for the containing cell.
    pub fn unproject(&self, world: Vec2) -> Vec2 {
        (world - self.corner()) / self.cell_size
    }
    /// The cell containing a world position, or [None] if it falls outside the grid or is not
    /// finite.
    pub fn cell_at(&self, world: Vec2) -> Option<Point> {
        let fractional = self.unproject(world);
        if !fractional.is_finite() {
            return None;
        }
        let snap = |v: f32| {
            let rounded = v.round();
            if (v - rounded).abs() < SNAP_EPSILON {
                rounded
            } else {
                v.floor()
            }
        };
        let cell = Point::new(snap(fractional.x) as i32, snap(fractional.y) as i32);
        self.contains(&cell).then_some(cell)
    }

    pub fn contains(&self, cell: &Point) -> bool {
        self.index(cell).is_some()
    }
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }
    pub fn index(&self, cell: &Point) -> Option<usize> {
        cell_index(cell, self.cols, self.rows)
    }
    pub fn point(&self, index: usize) -> Option<Point> {
        (index < self.cell_count())
            .then(|| Point::new((index % self.cols) as i32, (index / self.cols) as i32))
    }

    /// All cells in row-major order together with their projected world position.
    pub fn cells(&self) -> impl Iterator<Item = (Vec2, Point)> + '_ {
        iproduct!(0..self.rows, 0..self.cols).map(move |(row, col)| {
            let cell = Point::new(col as i32, row as i32);
            (self.project(&cell), cell)
        })
    }
    pub fn for_each_cell<F>(&self, mut callback: F)
    where
        F: FnMut(Vec2, Point),
    {
        for (world, cell) in self.cells() {
            callback(world, cell);
        }
    }
}
