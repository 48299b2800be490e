//! Sensor engine: reads goal metrics against actors and terrain
//!
//! Evaluation is pure. A metric whose sensor cannot be read (no actor bound,
//! actor without the needed capability) comes back with no reading, and an
//! unread metric never satisfies a goal.

use crate::core::types::{Position, UP};
use crate::ecs::actor::{Actor, Actors};
use crate::entity::body::PartType;
use crate::goals::metric::{Context, Metric, MetricKind};
use crate::spatial::region::{adjacent_or_same, close_enough, MovePrecision};
use crate::world::volume::VoxelVolume;

/// Read-only view of the world used to evaluate metrics
#[derive(Clone, Copy)]
pub struct Sensors<'a> {
    actors: &'a Actors,
    volume: &'a VoxelVolume,
}

impl<'a> Sensors<'a> {
    pub fn new(actors: &'a Actors, volume: &'a VoxelVolume) -> Self {
        Self { actors, volume }
    }

    pub fn actors(&self) -> &'a Actors {
        self.actors
    }

    pub fn volume(&self) -> &'a VoxelVolume {
        self.volume
    }

    /// Evaluate one metric, returning a copy with its reading filled in
    pub fn read_metric(&self, metric: &Metric, ctx: &Context) -> Metric {
        match metric.kind {
            MetricKind::MeleeRange => match self.actor_position(metric, ctx) {
                Some(pos) => metric.with_reading(adjacent_or_same(pos, ctx.position)),
                None => metric.unread(),
            },

            MetricKind::MeleeRangeDepth => match self.actor_position(metric, ctx) {
                Some(pos) => metric.with_reading(close_enough(
                    pos + UP,
                    ctx.position,
                    MovePrecision::AdjacentDepth,
                )),
                None => metric.unread(),
            },

            MetricKind::HaveHand => self.read_body_part(metric, ctx, PartType::Hand),
            MetricKind::HaveLeg => self.read_body_part(metric, ctx, PartType::Leg),

            MetricKind::HaveMiningPick => metric.with_reading(true),

            MetricKind::BlockIsNotSolid => match metric.argument.as_position() {
                // Air or liquid satisfy the condition
                Some(pos) => metric.with_reading(!self.volume.get_voxel(pos).is_solid()),
                None => {
                    debug_assert!(false, "BlockIsNotSolid needs a position argument, got {:?}", metric.argument);
                    tracing::warn!(argument = ?metric.argument, "BlockIsNotSolid without position argument");
                    metric.unread()
                }
            },
        }
    }

    /// For every metric in `desired`, read the current situation
    pub fn current_situation(&self, desired: &[Metric], ctx: &Context) -> Vec<Metric> {
        desired.iter().map(|m| self.read_metric(m, ctx)).collect()
    }

    /// True iff every metric of `goal` reads its desired value
    pub fn conditions_stand_true(&self, goal: &[Metric], ctx: &Context) -> bool {
        goal.iter().all(|m| self.read_metric(m, ctx).satisfies(m))
    }

    fn read_body_part(&self, metric: &Metric, ctx: &Context, part: PartType) -> Metric {
        match self.bound_actor(metric, ctx).and_then(Actor::as_body) {
            Some(body) => metric.with_reading(body.has_body_part(part)),
            None => metric.unread(),
        }
    }

    fn actor_position(&self, metric: &Metric, ctx: &Context) -> Option<Position> {
        self.bound_actor(metric, ctx).and_then(Actor::position)
    }

    fn bound_actor(&self, metric: &Metric, ctx: &Context) -> Option<&'a Actor> {
        debug_assert!(
            ctx.actor.is_some(),
            "{:?} evaluated without an actor bound into the context",
            metric.kind
        );
        let Some(id) = ctx.actor else {
            tracing::warn!(kind = ?metric.kind, "metric needs an actor, none bound");
            return None;
        };
        let actor = self.actors.get(id);
        if actor.is_none() {
            tracing::debug!(%id, kind = ?metric.kind, "metric bound to unknown actor");
        }
        actor
    }
}
