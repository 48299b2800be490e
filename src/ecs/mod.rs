//! Actors and the world that owns them

pub mod actor;
pub mod world;

pub use actor::{Actor, ActorDraft, Actors, Capability, EntityState};
pub use world::{MineOutcome, World};
