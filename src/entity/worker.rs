//! Worker brain: adopts one mining order at a time and sees it through

use std::sync::Arc;

use crate::core::types::{PlanResult, Position};
use crate::entity::brains::{BrainContext, BrainEffect, Brains};
use crate::entity::route::{Route, RouteState};
use crate::goals::metric::{Metric, MetricKind};
use crate::orders::order::{Order, OrderReport};

/// Brain of a simple digger
///
/// Each tick, in order: report done if the goal already holds, give up if
/// the body cannot dig, dig if the target is in reach, otherwise walk to a
/// cell next to the target.
#[derive(Debug, Default)]
pub struct WorkerBrain {
    intent: Option<Arc<Order>>,
}

impl WorkerBrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intent(&self) -> Option<&Arc<Order>> {
        self.intent.as_ref()
    }

    fn give_up(&mut self, report: OrderReport) -> Vec<BrainEffect> {
        self.intent = None;
        vec![BrainEffect::StopTravel, BrainEffect::Report(report)]
    }
}

/// Cell on `from`'s layer touching `target` from `from`'s side
fn approach_cell(from: Position, target: Position) -> Position {
    let offset = (from - target).clamp(Position::splat(-1), Position::ONE);
    Position::new(target.x + offset.x, from.y, target.z + offset.z)
}

impl Brains for WorkerBrain {
    fn think(&mut self, ctx: &BrainContext<'_>) -> Vec<BrainEffect> {
        let Some(order) = self.intent.clone() else {
            return Vec::new();
        };

        if ctx.holds(&order, &order.goal) {
            self.intent = None;
            return vec![BrainEffect::Report(OrderReport::fulfilled(order.id, PlanResult::Done))];
        }

        let can_dig = [
            Metric::flag(MetricKind::HaveHand, true),
            Metric::flag(MetricKind::HaveMiningPick, true),
        ];
        if !ctx.holds(&order, &can_dig) {
            return self.give_up(OrderReport::impossible(order.id, PlanResult::NoPlan));
        }

        // The world's border is never dug away
        if !ctx.sensors.volume().bounds().contains(order.position()) {
            return self.give_up(OrderReport::impossible(order.id, PlanResult::NoPlan));
        }

        let in_reach = ctx.holds(&order, &[Metric::flag(MetricKind::MeleeRange, true)])
            || ctx.holds(&order, &[Metric::flag(MetricKind::MeleeRangeDepth, true)]);
        if in_reach {
            return vec![BrainEffect::Mine(order.position())];
        }

        match ctx.route_state() {
            Some(RouteState::Walking) => Vec::new(),
            Some(RouteState::Stuck) => {
                self.give_up(OrderReport::failed(order.id, PlanResult::MoveStuck))
            }
            Some(RouteState::Arrived) | None => {
                let Some(pos) = ctx.position() else {
                    return self.give_up(OrderReport::impossible(order.id, PlanResult::NoPlan));
                };
                match Route::straight_line(pos, approach_cell(pos, order.position())) {
                    Some(route) if route.is_active() => vec![BrainEffect::Travel(route)],
                    _ => self.give_up(OrderReport::failed(order.id, PlanResult::MoveNoRoute)),
                }
            }
        }
    }

    fn is_idle(&self) -> bool {
        self.intent.is_none()
    }

    fn want(&mut self, order: Arc<Order>) -> bool {
        if self.intent.is_some() {
            return false;
        }
        tracing::trace!(order = %order.id, "worker adopts order");
        self.intent = Some(order);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ActorId, OrderId};
    use crate::ecs::actor::{ActorDraft, Actors};
    use crate::entity::body::{Body, PartType};
    use crate::goals::sensors::Sensors;
    use crate::orders::order::{OrderDraft, ReportKind, TargetKind};
    use crate::spatial::region::Region;
    use crate::world::volume::VoxelVolume;
    use crate::world::voxel::Voxel;

    const ACTOR: ActorId = ActorId(0);

    fn setup(actor_pos: Position, body: Body) -> (Actors, VoxelVolume) {
        let mut actors = Actors::new();
        actors.insert(
            ActorDraft::new("digger")
                .with_position(actor_pos)
                .with_body(body)
                .into_actor(ACTOR),
        );
        let volume = VoxelVolume::new(
            Region::from_corners(Position::splat(-16), Position::splat(16)),
            Voxel::Rock,
        );
        (actors, volume)
    }

    fn order_at(pos: Position) -> Arc<Order> {
        Arc::new(Order::from_draft(
            OrderId(1),
            OrderDraft::mine(pos, TargetKind::Position),
        ))
    }

    fn think(brain: &mut WorkerBrain, actors: &Actors, volume: &VoxelVolume) -> Vec<BrainEffect> {
        let ctx = BrainContext {
            actor: ACTOR,
            tick: 0,
            sensors: Sensors::new(actors, volume),
        };
        brain.think(&ctx)
    }

    #[test]
    fn test_idle_brain_does_nothing() {
        let (actors, volume) = setup(Position::ZERO, Body::humanoid());
        let mut brain = WorkerBrain::new();
        assert!(brain.is_idle());
        assert!(think(&mut brain, &actors, &volume).is_empty());
    }

    #[test]
    fn test_adopts_only_one_order() {
        let mut brain = WorkerBrain::new();
        assert!(brain.want(order_at(Position::ZERO)));
        assert!(!brain.want(order_at(Position::ONE)));
        assert!(!brain.is_idle());
    }

    #[test]
    fn test_mines_target_in_reach() {
        let target = Position::new(1, 0, 0);
        let (actors, mut volume) = setup(Position::ZERO, Body::humanoid());
        volume.set_voxel(target, Voxel::Rock);
        let mut brain = WorkerBrain::new();
        brain.want(order_at(target));

        assert_eq!(think(&mut brain, &actors, &volume), vec![BrainEffect::Mine(target)]);

        volume.set_voxel(target, Voxel::Air);
        let effects = think(&mut brain, &actors, &volume);
        assert!(matches!(
            effects.as_slice(),
            [BrainEffect::Report(r)] if r.kind == ReportKind::Fulfilled && r.result == PlanResult::Done
        ));
        assert!(brain.is_idle());
    }

    #[test]
    fn test_handless_worker_reports_impossible() {
        let target = Position::new(1, 0, 0);
        let (actors, mut volume) = setup(Position::ZERO, Body::new(vec![PartType::Leg]));
        volume.set_voxel(target, Voxel::Rock);
        let mut brain = WorkerBrain::new();
        brain.want(order_at(target));

        let effects = think(&mut brain, &actors, &volume);
        assert!(effects.iter().any(|e| matches!(
            e,
            BrainEffect::Report(r) if r.kind == ReportKind::Impossible
        )));
        assert!(brain.is_idle());
    }

    #[test]
    fn test_target_past_border_is_impossible() {
        let (actors, volume) = setup(Position::new(16, 0, 0), Body::humanoid());
        let mut brain = WorkerBrain::new();
        brain.want(order_at(Position::new(17, 0, 0)));

        let effects = think(&mut brain, &actors, &volume);
        assert!(!effects.iter().any(|e| matches!(e, BrainEffect::Mine(_))));
        assert!(effects.iter().any(|e| matches!(
            e,
            BrainEffect::Report(r) if r.kind == ReportKind::Impossible
        )));
        assert!(brain.is_idle());
    }

    #[test]
    fn test_walks_towards_distant_target() {
        let target = Position::new(5, 0, 0);
        let (actors, mut volume) = setup(Position::ZERO, Body::humanoid());
        volume.set_voxel(target, Voxel::Rock);
        let mut brain = WorkerBrain::new();
        brain.want(order_at(target));

        let effects = think(&mut brain, &actors, &volume);
        match effects.as_slice() {
            [BrainEffect::Travel(route)] => {
                assert_eq!(route.destination(), Some(Position::new(4, 0, 0)));
            }
            other => panic!("expected travel, got {other:?}"),
        }
    }

    #[test]
    fn test_unreachable_layer_fails_with_no_route() {
        let target = Position::new(0, 5, 0);
        let (actors, mut volume) = setup(Position::ZERO, Body::humanoid());
        volume.set_voxel(target, Voxel::Rock);
        let mut brain = WorkerBrain::new();
        brain.want(order_at(target));

        let effects = think(&mut brain, &actors, &volume);
        assert!(effects.iter().any(|e| matches!(
            e,
            BrainEffect::Report(r) if r.kind == ReportKind::Failed && r.result == PlanResult::MoveNoRoute
        )));
    }

    #[test]
    fn test_approach_cell() {
        let target = Position::new(5, 2, 5);
        assert_eq!(approach_cell(Position::new(0, 2, 9), target), Position::new(4, 2, 6));
        assert_eq!(approach_cell(Position::new(5, 1, 0), target), Position::new(5, 1, 4));
    }
}
