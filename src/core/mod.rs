pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{DelveError, Result};
pub use types::{ActorId, ObjectId, OrderId, PlanResult, Position, Tick, DOWN, UP};
