//! Route execution: one cell of travel per tick

use std::collections::VecDeque;

use crate::core::types::Position;
use crate::spatial::region::adjacent_or_same;
use crate::world::volume::VoxelVolume;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    Walking,
    Arrived,
    Stuck,
}

/// What a single movement step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStep {
    Moved(Position),
    Arrived,
    Stuck,
    /// Route already finished earlier
    Idle,
}

/// Planned walk as a list of cells to enter, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    waypoints: VecDeque<Position>,
    state: RouteState,
}

impl Route {
    pub fn new(waypoints: impl IntoIterator<Item = Position>) -> Self {
        let waypoints: VecDeque<_> = waypoints.into_iter().collect();
        let state = if waypoints.is_empty() {
            RouteState::Arrived
        } else {
            RouteState::Walking
        };
        Self { waypoints, state }
    }

    /// Layer-local route: along x first, then along z
    ///
    /// Returns `None` when `to` is on another layer; the walker never climbs.
    pub fn straight_line(from: Position, to: Position) -> Option<Self> {
        if from.y != to.y {
            return None;
        }
        let mut cells = Vec::new();
        let mut cur = from;
        while cur.x != to.x {
            cur.x += (to.x - cur.x).signum();
            cells.push(cur);
        }
        while cur.z != to.z {
            cur.z += (to.z - cur.z).signum();
            cells.push(cur);
        }
        Some(Self::new(cells))
    }

    pub fn state(&self) -> RouteState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RouteState::Walking
    }

    pub fn remaining(&self) -> usize {
        self.waypoints.len()
    }

    pub fn destination(&self) -> Option<Position> {
        self.waypoints.back().copied()
    }

    /// Advance one cell. The next cell must touch `position` on its layer
    /// and must not be solid, otherwise the route gets stuck.
    pub fn step(&mut self, position: &mut Position, volume: &VoxelVolume) -> RouteStep {
        if self.state != RouteState::Walking {
            return RouteStep::Idle;
        }
        let Some(&next) = self.waypoints.front() else {
            self.state = RouteState::Arrived;
            return RouteStep::Arrived;
        };
        if !adjacent_or_same(*position, next) || volume.get_voxel(next).is_solid() {
            self.waypoints.clear();
            self.state = RouteState::Stuck;
            return RouteStep::Stuck;
        }
        *position = next;
        self.waypoints.pop_front();
        if self.waypoints.is_empty() {
            self.state = RouteState::Arrived;
        }
        RouteStep::Moved(next)
    }
}
