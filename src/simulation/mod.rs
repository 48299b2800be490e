//! Simulation systems - per-tick driver over the world

pub mod tick;

pub use tick::{run_simulation_tick, SimulationEvent};
