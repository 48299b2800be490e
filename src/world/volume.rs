//! Sparse bounded voxel volume

use ahash::AHashMap;

use crate::core::types::Position;
use crate::spatial::region::Region;
use crate::world::voxel::Voxel;

/// Voxel store keyed by integer cell coordinates
///
/// Only non-air cells inside `bounds` are stored. Reads outside the bounds
/// return the border voxel; writes outside the bounds are dropped.
#[derive(Debug, Clone)]
pub struct VoxelVolume {
    bounds: Region,
    border: Voxel,
    cells: AHashMap<Position, Voxel>,
}

impl VoxelVolume {
    pub fn new(bounds: Region, border: Voxel) -> Self {
        Self {
            bounds,
            border,
            cells: AHashMap::new(),
        }
    }

    pub fn bounds(&self) -> Region {
        self.bounds
    }

    pub fn get_voxel(&self, pos: Position) -> Voxel {
        if !self.bounds.contains(pos) {
            return self.border;
        }
        self.cells.get(&pos).copied().unwrap_or_default()
    }

    /// Returns false if `pos` is outside the volume
    pub fn set_voxel(&mut self, pos: Position, voxel: Voxel) -> bool {
        if !self.bounds.contains(pos) {
            tracing::warn!(?pos, "voxel write outside volume bounds ignored");
            return false;
        }
        if voxel.is_air() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, voxel);
        }
        true
    }

    /// Fill every in-bounds cell of `region` with `voxel`
    pub fn fill(&mut self, region: Region, voxel: Voxel) {
        for x in region.lo.x..=region.hi.x {
            for y in region.lo.y..=region.hi.y {
                for z in region.lo.z..=region.hi.z {
                    let pos = Position::new(x, y, z);
                    if self.bounds.contains(pos) {
                        if voxel.is_air() {
                            self.cells.remove(&pos);
                        } else {
                            self.cells.insert(pos, voxel);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_volume() -> VoxelVolume {
        VoxelVolume::new(
            Region::from_corners(Position::ZERO, Position::splat(7)),
            Voxel::Rock,
        )
    }

    #[test]
    fn test_unset_cells_are_air() {
        let vol = small_volume();
        assert_eq!(vol.get_voxel(Position::new(3, 3, 3)), Voxel::Air);
    }

    #[test]
    fn test_outside_bounds_reads_border() {
        let mut vol = small_volume();
        let outside = Position::new(8, 0, 0);
        assert_eq!(vol.get_voxel(outside), Voxel::Rock);
        assert!(!vol.set_voxel(outside, Voxel::Air));
        assert_eq!(vol.get_voxel(outside), Voxel::Rock);
    }

    #[test]
    fn test_setting_air_clears_cell() {
        let mut vol = small_volume();
        let p = Position::new(1, 2, 3);
        vol.set_voxel(p, Voxel::Soil);
        assert_eq!(vol.get_voxel(p), Voxel::Soil);
        vol.set_voxel(p, Voxel::Air);
        assert_eq!(vol.get_voxel(p), Voxel::Air);
        assert!(vol.cells.is_empty());
    }

    #[test]
    fn test_fill_clips_to_bounds() {
        let mut vol = small_volume();
        vol.fill(
            Region::from_corners(Position::new(6, 0, 0), Position::new(9, 0, 0)),
            Voxel::Rock,
        );
        assert_eq!(vol.cells.len(), 2);
        assert!(vol.get_voxel(Position::new(7, 0, 0)).is_rock());
    }
}
