//! Brains capability: how an actor decides what to do with offered orders

use std::fmt;
use std::sync::Arc;

use crate::core::types::{ActorId, Position, Tick};
use crate::entity::route::{Route, RouteState};
use crate::goals::metric::Metric;
use crate::goals::sensors::Sensors;
use crate::orders::order::{Order, OrderReport};

/// What a brain asks the world to do after thinking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrainEffect {
    /// Report an adopted order's outcome to the registry
    Report(OrderReport),
    /// Dig out the voxel at the position
    Mine(Position),
    /// Start walking this route, replacing any current one
    Travel(Route),
    /// Drop the current route
    StopTravel,
}

/// Read-only view handed to a brain while it thinks
pub struct BrainContext<'a> {
    pub actor: ActorId,
    pub tick: Tick,
    pub sensors: Sensors<'a>,
}

impl<'a> BrainContext<'a> {
    pub fn position(&self) -> Option<Position> {
        self.sensors.actors().get(self.actor)?.position()
    }

    pub fn route_state(&self) -> Option<RouteState> {
        let entity = self.sensors.actors().get(self.actor)?.as_entity()?;
        entity.route.as_ref().map(Route::state)
    }

    /// Whether `conditions` all hold for this actor at the order's target
    pub fn holds(&self, order: &Order, conditions: &[Metric]) -> bool {
        let ctx = order.context.bound_to(self.actor);
        self.sensors.conditions_stand_true(conditions, &ctx)
    }
}

/// Decision-making capability of an actor
pub trait Brains: fmt::Debug {
    /// Advance internal state by one tick
    fn think(&mut self, ctx: &BrainContext<'_>) -> Vec<BrainEffect>;

    /// No order adopted, ready to be offered one
    fn is_idle(&self) -> bool;

    /// Offer an order; returns whether the brain adopted it
    fn want(&mut self, order: Arc<Order>) -> bool;
}
