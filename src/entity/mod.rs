pub mod body;
pub mod brains;
pub mod route;
pub mod worker;

pub use body::{Body, PartType};
pub use brains::{BrainContext, BrainEffect, Brains};
pub use route::{Route, RouteState, RouteStep};
pub use worker::WorkerBrain;
