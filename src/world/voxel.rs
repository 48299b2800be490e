//! Voxel material types

use serde::{Deserialize, Serialize};

/// Contents of a single voxel cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Voxel {
    #[default]
    Air = 0,
    Water = 1,
    Soil = 2,
    Rock = 3,
}

impl Voxel {
    /// Blocks movement and can be mined
    pub fn is_solid(self) -> bool {
        matches!(self, Voxel::Soil | Voxel::Rock)
    }

    pub fn is_rock(self) -> bool {
        self == Voxel::Rock
    }

    pub fn is_air(self) -> bool {
        self == Voxel::Air
    }

    pub fn is_liquid(self) -> bool {
        self == Voxel::Water
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solidity() {
        assert!(Voxel::Rock.is_solid());
        assert!(Voxel::Soil.is_solid());
        assert!(!Voxel::Air.is_solid());
        assert!(!Voxel::Water.is_solid());
    }

    #[test]
    fn test_only_rock_is_rock() {
        assert!(Voxel::Rock.is_rock());
        assert!(!Voxel::Soil.is_rock());
        assert!(Voxel::default().is_air());
        assert!(Voxel::Water.is_liquid());
    }
}
