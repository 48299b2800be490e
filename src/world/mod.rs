//! Voxel terrain and inanimate world objects

pub mod objects;
pub mod volume;
pub mod voxel;

pub use objects::{InanimateKind, InanimateObject, WorldObjects};
pub use volume::VoxelVolume;
pub use voxel::Voxel;
