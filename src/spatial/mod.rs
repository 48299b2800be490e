//! Spatial indexing over voxel cells

pub mod actor_index;
pub mod point_multimap;
pub mod region;

pub use actor_index::ActorIndex;
pub use point_multimap::PointMultimap;
pub use region::{adjacent_or_same, close_enough, MovePrecision, Region};
