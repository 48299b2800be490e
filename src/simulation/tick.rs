//! Tick system - orchestrates simulation updates
//!
//! Each tick runs two passes over all actors in ascending id order:
//! physics (gravity, then route continuation) and decisions (think, apply
//! effects, offer orders to idle brains). Spatial index updates are deferred
//! to the end of each pass.

use serde::Serialize;

use crate::core::types::{ActorId, ObjectId, OrderId, PlanResult, Position, Tick};
use crate::ecs::world::{MineOutcome, World};
use crate::entity::brains::{BrainContext, BrainEffect};
use crate::entity::route::RouteStep;
use crate::orders::order::ReportKind;
use crate::world::objects::InanimateKind;

/// Events generated during simulation tick
///
/// Returned by `run_simulation_tick` for logging and the demo's JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum SimulationEvent {
    /// Nothing under the actor, it dropped one cell
    ActorFell {
        actor: ActorId,
        from: Position,
        to: Position,
        tick: Tick,
    },
    /// Actor took one step along its route
    ActorMoved {
        actor: ActorId,
        from: Position,
        to: Position,
        tick: Tick,
    },
    /// Next cell of the route was blocked
    RouteStuck {
        actor: ActorId,
        at: Position,
        tick: Tick,
    },
    /// An idle brain adopted an offered order
    OrderAdopted {
        actor: ActorId,
        order: OrderId,
        tick: Tick,
    },
    /// A brain reported on its order
    OrderReported {
        actor: ActorId,
        order: OrderId,
        kind: ReportKind,
        result: PlanResult,
        tick: Tick,
    },
    /// Registry dropped an order whose goal already held
    OrderEvicted { order: OrderId, tick: Tick },
    VoxelMined {
        actor: ActorId,
        position: Position,
        tick: Tick,
    },
    /// Mining left a resource behind
    ObjectSpawned {
        object: ObjectId,
        kind: InanimateKind,
        position: Position,
        tick: Tick,
    },
}

/// Run a single simulation tick
pub fn run_simulation_tick(world: &mut World) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    move_actors(world, &mut events);
    decide_actions(world, &mut events);

    world.tick();

    events
}

/// Physics pass: gravity, then route continuation
fn move_actors(world: &mut World, events: &mut Vec<SimulationEvent>) {
    let tick = world.current_tick;

    for id in world.actors().ids() {
        if let Some((from, to)) = world.apply_gravity(id) {
            tracing::debug!(actor = %id, ?from, ?to, "actor fell");
            events.push(SimulationEvent::ActorFell {
                actor: id,
                from,
                to,
                tick,
            });
        }

        // Routes are layer-local, so a route step right after a fall gets
        // stuck instead of moving the actor a second time this tick

        match world.advance_route(id) {
            Some((from, RouteStep::Moved(to))) => {
                events.push(SimulationEvent::ActorMoved {
                    actor: id,
                    from,
                    to,
                    tick,
                });
            }
            Some((at, RouteStep::Stuck)) => {
                tracing::debug!(actor = %id, ?at, "route stuck");
                events.push(SimulationEvent::RouteStuck { actor: id, at, tick });
            }
            _ => {}
        }
    }

    world.apply_pending_moves();
}

/// Decision pass: let each brain think, apply its effects, then offer an
/// order if it ended up idle
fn decide_actions(world: &mut World, events: &mut Vec<SimulationEvent>) {
    let tick = world.current_tick;

    for id in world.actors().ids() {
        // Brains leave the actor while thinking so the world stays borrowable
        let Some(mut brains) = world.actor_mut(id).and_then(|a| a.brains.take()) else {
            continue;
        };

        let effects = {
            let ctx = BrainContext {
                actor: id,
                tick,
                sensors: world.sensors(),
            };
            brains.think(&ctx)
        };
        for effect in effects {
            apply_effect(world, id, effect, tick, events);
        }

        if brains.is_idle() && world.have_orders() {
            if let Some(order) = world.get_random_order(id) {
                let order_id = order.id;
                if brains.want(order) {
                    events.push(SimulationEvent::OrderAdopted {
                        actor: id,
                        order: order_id,
                        tick,
                    });
                }
            }
        }

        for order in world.orders_mut().take_evicted() {
            events.push(SimulationEvent::OrderEvicted { order, tick });
        }

        if let Some(actor) = world.actor_mut(id) {
            actor.brains = Some(brains);
        }
    }

    world.apply_pending_moves();
}

fn apply_effect(
    world: &mut World,
    actor: ActorId,
    effect: BrainEffect,
    tick: Tick,
    events: &mut Vec<SimulationEvent>,
) {
    match effect {
        BrainEffect::Report(report) => {
            world.apply_report(report);
            events.push(SimulationEvent::OrderReported {
                actor,
                order: report.order,
                kind: report.kind,
                result: report.result,
                tick,
            });
        }
        BrainEffect::Mine(position) => match world.mine_voxel(position) {
            MineOutcome::Mined { dropped } => {
                events.push(SimulationEvent::VoxelMined {
                    actor,
                    position,
                    tick,
                });
                if let Some(object) = dropped {
                    events.push(SimulationEvent::ObjectSpawned {
                        object,
                        kind: InanimateKind::Boulder,
                        position,
                        tick,
                    });
                }
            }
            MineOutcome::NotSolid | MineOutcome::OutOfBounds => {}
        },
        BrainEffect::Travel(route) => world.set_route(actor, Some(route)),
        BrainEffect::StopTravel => world.set_route(actor, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::ecs::actor::ActorDraft;
    use crate::entity::body::Body;
    use crate::entity::worker::WorkerBrain;
    use crate::spatial::region::Region;
    use crate::world::voxel::Voxel;

    fn floored_world(rock_drop_chance: u32) -> World {
        let config = SimulationConfig {
            rock_drop_chance,
            ..Default::default()
        };
        let mut world = World::new(config).unwrap();
        // Floor at y = 1 under a walkable layer at y = 0
        world.fill(
            Region::from_corners(Position::new(-8, 1, -8), Position::new(8, 1, 8)),
            Voxel::Rock,
        );
        world
    }

    fn spawn_worker(world: &mut World, pos: Position) -> ActorId {
        world.spawn_actor(
            ActorDraft::new("worker")
                .with_position(pos)
                .with_body(Body::humanoid())
                .with_brains(Box::new(WorkerBrain::new())),
        )
    }

    #[test]
    fn test_tick_advances_step_once() {
        let mut world = floored_world(25);
        run_simulation_tick(&mut world);
        run_simulation_tick(&mut world);
        assert_eq!(world.current_tick, 2);
    }

    #[test]
    fn test_falling_actor_moves_once_per_tick() {
        let mut world = floored_world(25);
        let a = world.spawn_actor(ActorDraft::new("rock").with_position(Position::new(0, -3, 0)));

        for expected_y in [-2, -1, 0, 0] {
            run_simulation_tick(&mut world);
            let pos = world.actor(a).unwrap().position().unwrap();
            assert_eq!(pos.y, expected_y);
            assert_eq!(world.actors_at(pos), &[a]);
        }
    }

    #[test]
    fn test_idle_worker_adopts_order() {
        let mut world = floored_world(0);
        let a = spawn_worker(&mut world, Position::ZERO);
        world.set_voxel(Position::new(1, 0, 0), Voxel::Rock);
        let order = world.add_mining_goal(None, Position::new(1, 0, 0)).unwrap()[0];

        let events = run_simulation_tick(&mut world);
        assert!(events.contains(&SimulationEvent::OrderAdopted {
            actor: a,
            order,
            tick: 0
        }));
    }

    #[test]
    fn test_worker_mines_adjacent_block() {
        let mut world = floored_world(0);
        let a = spawn_worker(&mut world, Position::ZERO);
        let target = Position::new(1, 0, 0);
        world.set_voxel(target, Voxel::Rock);
        let order = world.add_mining_goal(None, target).unwrap()[0];

        run_simulation_tick(&mut world);
        let events = run_simulation_tick(&mut world);
        assert!(events.contains(&SimulationEvent::VoxelMined {
            actor: a,
            position: target,
            tick: 1
        }));
        assert!(world.get_voxel(target).is_air());

        let events = run_simulation_tick(&mut world);
        assert!(events.contains(&SimulationEvent::OrderReported {
            actor: a,
            order,
            kind: ReportKind::Fulfilled,
            result: PlanResult::Done,
            tick: 2
        }));
        assert!(!world.have_orders());
    }

    #[test]
    fn test_worker_walks_to_distant_block() {
        let mut world = floored_world(0);
        let a = spawn_worker(&mut world, Position::ZERO);
        let target = Position::new(4, 0, 0);
        world.set_voxel(target, Voxel::Rock);
        world.add_mining_goal(None, target).unwrap();

        let mut mined = false;
        for _ in 0..10 {
            let events = run_simulation_tick(&mut world);
            if events
                .iter()
                .any(|e| matches!(e, SimulationEvent::VoxelMined { position, .. } if *position == target))
            {
                mined = true;
                break;
            }
        }
        assert!(mined);
        assert_eq!(world.actor(a).unwrap().position(), Some(Position::new(3, 0, 0)));
    }

    #[test]
    fn test_walker_losing_its_floor_falls_without_stepping() {
        let mut world = floored_world(25);
        let a = world.spawn_actor(ActorDraft::new("walker").with_position(Position::ZERO));
        world.set_route(
            a,
            crate::entity::route::Route::straight_line(Position::ZERO, Position::new(3, 0, 0)),
        );
        world.set_voxel(Position::new(0, 1, 0), Voxel::Air);

        let events = run_simulation_tick(&mut world);
        let below = Position::new(0, 1, 0);
        assert_eq!(
            events,
            vec![
                SimulationEvent::ActorFell {
                    actor: a,
                    from: Position::ZERO,
                    to: below,
                    tick: 0
                },
                SimulationEvent::RouteStuck {
                    actor: a,
                    at: below,
                    tick: 0
                },
            ]
        );
        assert_eq!(world.actor(a).unwrap().position(), Some(below));
        assert_eq!(world.actors_at(below), &[a]);
    }

    #[test]
    fn test_handless_worker_demotes_order() {
        let mut world = floored_world(0);
        world.spawn_actor(
            ActorDraft::new("stump")
                .with_position(Position::ZERO)
                .with_body(Body::new(Vec::new()))
                .with_brains(Box::new(WorkerBrain::new())),
        );
        let target = Position::new(1, 0, 0);
        world.set_voxel(target, Voxel::Rock);
        let order = world.add_mining_goal(None, target).unwrap()[0];

        run_simulation_tick(&mut world);
        run_simulation_tick(&mut world);
        assert_eq!(
            world.orders().tier_of(order),
            Some(crate::orders::registry::Tier::Low)
        );
    }
}
