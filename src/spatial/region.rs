//! Axis-aligned voxel regions and adjacency rules

use serde::{Deserialize, Serialize};

use crate::core::types::Position;

/// Inclusive axis-aligned box of voxel cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub lo: Position,
    pub hi: Position,
}

impl Region {
    /// Region spanned by two arbitrary corners, normalized so `lo <= hi`
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            lo: a.min(b),
            hi: a.max(b),
        }
    }

    /// Single-cell region
    pub fn cell(pos: Position) -> Self {
        Self { lo: pos, hi: pos }
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.cmpge(self.lo).all() && pos.cmple(self.hi).all()
    }

    /// Cells of the x/z rectangle at layer `y`, x-major
    pub fn layer_cells(&self, y: i32) -> impl Iterator<Item = Position> {
        let (lo, hi) = (self.lo, self.hi);
        (lo.x..=hi.x).flat_map(move |x| (lo.z..=hi.z).map(move |z| Position::new(x, y, z)))
    }
}

/// How close an actor has to get to a target cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovePrecision {
    /// Standing on the cell itself
    Exact,
    /// On the same layer, touching the cell (diagonals count)
    Adjacent,
    /// Touching the cell horizontally, on its layer or one layer above it
    AdjacentDepth,
}

#[inline]
fn planar_chebyshev(a: Position, b: Position) -> i32 {
    (a.x - b.x).abs().max((a.z - b.z).abs())
}

/// Same layer and Chebyshev distance <= 1 in the x/z plane
pub fn adjacent_or_same(a: Position, b: Position) -> bool {
    a.y == b.y && planar_chebyshev(a, b) <= 1
}

/// Whether `a` is close enough to `b` under the given precision
pub fn close_enough(a: Position, b: Position, precision: MovePrecision) -> bool {
    match precision {
        MovePrecision::Exact => a == b,
        MovePrecision::Adjacent => adjacent_or_same(a, b),
        // +Y is down: b sits on a's layer or directly one below
        MovePrecision::AdjacentDepth => {
            planar_chebyshev(a, b) <= 1 && (b.y == a.y || b.y == a.y + 1)
        }
    }
}
