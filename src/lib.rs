//! Delve - voxel colony simulation with goal-directed work assignment

pub mod core;
pub mod ecs;
pub mod entity;
pub mod goals;
pub mod orders;
pub mod simulation;
pub mod spatial;
pub mod world;
