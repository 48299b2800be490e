//! Position-keyed multimap for voxel-cell spatial queries

use std::collections::BTreeMap;

use crate::core::types::Position;
use crate::spatial::region::Region;

type CellKey = [i32; 3];

/// Multi-valued map from voxel cells to items
///
/// Cells are kept in a `BTreeMap` ordered by (x, y, z) so region scans and
/// full iteration are deterministic. Empty cells are dropped eagerly.
#[derive(Debug, Clone)]
pub struct PointMultimap<T> {
    cells: BTreeMap<CellKey, Vec<T>>,
    len: usize,
}

impl<T: Copy + PartialEq> PointMultimap<T> {
    pub fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, item: T, pos: Position) {
        self.cells.entry(pos.to_array()).or_default().push(item);
        self.len += 1;
    }

    /// Remove one occurrence of `item` at `pos`, returns false if absent
    pub fn remove(&mut self, item: T, pos: Position) -> bool {
        let key = pos.to_array();
        let Some(cell) = self.cells.get_mut(&key) else {
            return false;
        };
        let Some(idx) = cell.iter().position(|&i| i == item) else {
            return false;
        };
        cell.remove(idx);
        if cell.is_empty() {
            self.cells.remove(&key);
        }
        self.len -= 1;
        true
    }

    /// Move `item` from `old` to `new`; inserts at `new` even if `old` was stale
    pub fn relocate(&mut self, item: T, old: Position, new: Position) -> bool {
        let found = self.remove(item, old);
        self.insert(item, new);
        found
    }

    pub fn query_point(&self, pos: Position) -> &[T] {
        self.cells
            .get(&pos.to_array())
            .map(|cell| cell.as_slice())
            .unwrap_or(&[])
    }

    /// Lazily yield every item inside the inclusive box `lo..=hi`
    ///
    /// `lo` must be component-wise <= `hi`; an inverted box yields nothing.
    pub fn query_region(&self, lo: Position, hi: Position) -> impl Iterator<Item = (T, Position)> + '_ {
        debug_assert!(lo.cmple(hi).all(), "region corners not normalized: {lo:?} > {hi:?}");
        let region = Region { lo, hi };
        let (start, end) = (lo.to_array(), hi.to_array());
        // Lexicographic key range is a superset of the box; the filter trims it
        let range = if lo.cmple(hi).all() {
            self.cells.range(start..=end)
        } else {
            self.cells.range(start..start)
        };
        range
            .filter(move |(key, _)| region.contains(Position::from_array(**key)))
            .flat_map(|(key, cell)| {
                let pos = Position::from_array(*key);
                cell.iter().map(move |&item| (item, pos))
            })
    }

    /// Every item with its position, in cell order
    pub fn iter(&self) -> impl Iterator<Item = (T, Position)> + '_ {
        self.cells.iter().flat_map(|(key, cell)| {
            let pos = Position::from_array(*key);
            cell.iter().map(move |&item| (item, pos))
        })
    }
}

impl<T: Copy + PartialEq> Default for PointMultimap<T> {
    fn default() -> Self {
        Self::new()
    }
}
