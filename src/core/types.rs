//! Core type definitions used throughout the codebase

use glam::IVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Voxel cell coordinate. `+Y` points down, towards gravity.
pub type Position = IVec3;

/// One cell towards gravity
pub const DOWN: Position = IVec3::new(0, 1, 0);

/// One cell against gravity
pub const UP: Position = IVec3::new(0, -1, 0);

/// Simulation step counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for actors
///
/// Allocated sequentially by the world and never reused, so it doubles as
/// the deterministic iteration order for every per-actor pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Unique identifier for inanimate objects (dropped resources)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Unique identifier for orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order#{}", self.0)
    }
}

/// Outcome an actor attaches to an order report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanResult {
    Success,
    MoveStuck,
    MoveNoRoute,
    Done,
    NoPlan,
}

impl fmt::Display for PlanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanResult::Success => "success",
            PlanResult::MoveStuck => "stuck",
            PlanResult::MoveNoRoute => "no route",
            PlanResult::Done => "plan done",
            PlanResult::NoPlan => "no plan",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_ordering() {
        assert!(ActorId(1) < ActorId(2));
        assert_eq!(ActorId(7), ActorId(7));
    }

    #[test]
    fn test_down_is_positive_y() {
        let p = Position::new(3, 4, 5);
        assert_eq!(p + DOWN, Position::new(3, 5, 5));
        assert_eq!(p + DOWN + UP, p);
    }

    #[test]
    fn test_plan_result_display() {
        assert_eq!(PlanResult::MoveNoRoute.to_string(), "no route");
        assert_eq!(PlanResult::Done.to_string(), "plan done");
    }
}
