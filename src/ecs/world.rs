//! ECS World - owns actors, terrain, objects and the order registry

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

use crate::core::config::SimulationConfig;
use crate::core::error::{DelveError, Result};
use crate::core::types::{ActorId, ObjectId, OrderId, PlanResult, Position, Tick, DOWN};
use crate::ecs::actor::{Actor, ActorDraft, Actors, EntityState};
use crate::entity::route::{Route, RouteStep};
use crate::goals::metric::{Context, Metric};
use crate::goals::sensors::Sensors;
use crate::orders::order::{Order, OrderDraft, OrderReport, ReportKind, TargetKind};
use crate::orders::registry::{OrderRegistry, Tier};
use crate::spatial::actor_index::ActorIndex;
use crate::spatial::region::Region;
use crate::world::objects::{InanimateKind, InanimateObject, WorldObjects};
use crate::world::volume::VoxelVolume;
use crate::world::voxel::Voxel;

/// Result of trying to mine a voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineOutcome {
    /// Voxel removed, possibly leaving a resource behind
    Mined { dropped: Option<ObjectId> },
    /// Nothing solid there; nothing changed
    NotSolid,
    /// Outside the volume; border cells cannot be dug
    OutOfBounds,
}

/// The game world
pub struct World {
    /// Simulation step, advanced once per completed tick
    pub current_tick: Tick,
    pub config: SimulationConfig,
    /// Terrain changed and the renderer should rebuild its mesh
    pub force_update_terrain_mesh: bool,
    actors: Actors,
    spatial: ActorIndex,
    volume: VoxelVolume,
    objects: WorldObjects,
    orders: OrderRegistry,
    rng: ChaCha8Rng,
    next_actor_id: u64,
}

impl World {
    /// Empty world with all-air terrain inside the configured bounds
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let bounds = Region::from_corners(config.world_bounds.lo(), config.world_bounds.hi());
        let volume = VoxelVolume::new(bounds, Voxel::Rock);
        Ok(Self::with_volume(config, volume))
    }

    /// World over an existing voxel volume; `config` is assumed valid
    pub fn with_volume(config: SimulationConfig, volume: VoxelVolume) -> Self {
        Self {
            current_tick: 0,
            force_update_terrain_mesh: false,
            actors: Actors::new(),
            spatial: ActorIndex::new(),
            volume,
            objects: WorldObjects::new(),
            orders: OrderRegistry::from_config(&config),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_actor_id: 0,
            config,
        }
    }

    pub fn tick(&mut self) {
        self.current_tick += 1;
    }

    //
    // Actors
    //

    pub fn spawn_actor(&mut self, draft: ActorDraft) -> ActorId {
        let id = ActorId(self.next_actor_id);
        self.next_actor_id += 1;
        let actor = draft.into_actor(id);
        if let Some(pos) = actor.position() {
            self.spatial.insert(id, pos);
        }
        tracing::debug!(%id, name = %actor.name, "spawned actor");
        self.actors.insert(actor);
        id
    }

    /// Remove an actor and purge it from the spatial index
    pub fn despawn_actor(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(id)?;
        self.spatial.purge(id);
        Some(actor)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    pub fn actors(&self) -> &Actors {
        &self.actors
    }

    /// Teleport an actor, updating the spatial index immediately
    ///
    /// Only for use between ticks; movement during a pass goes through
    /// `apply_gravity` and `advance_route`.
    pub fn place_actor(&mut self, id: ActorId, pos: Position) -> Result<()> {
        let actor = self.actors.get_mut(id).ok_or(DelveError::ActorNotFound(id))?;
        let old = actor.position();
        actor.entity.get_or_insert_with(|| EntityState::at(pos)).position = pos;
        match old {
            Some(old) => self.spatial.relocate(id, old, pos),
            None => self.spatial.insert(id, pos),
        }
        Ok(())
    }

    /// Mirror all deferred moves into the spatial index
    pub fn apply_pending_moves(&mut self) -> usize {
        let actors = &self.actors;
        self.spatial
            .apply_pending(|id| actors.get(id).and_then(Actor::position))
    }

    /// Drop an actor one cell if the cell under it is air
    ///
    /// Returns the `(from, to)` cells of the fall. The index is updated at the
    /// end of the pass.
    pub fn apply_gravity(&mut self, id: ActorId) -> Option<(Position, Position)> {
        let entity = self.actors.get_mut(id)?.as_entity_mut()?;
        let from = entity.position;
        if !self.volume.get_voxel(from + DOWN).is_air() {
            return None;
        }
        entity.position = from + DOWN;
        self.spatial.note_moved(id, from);
        Some((from, entity.position))
    }

    /// Advance an actor's route by one cell
    ///
    /// Returns the position before the step and what the step did.
    pub fn advance_route(&mut self, id: ActorId) -> Option<(Position, RouteStep)> {
        let entity = self.actors.get_mut(id)?.as_entity_mut()?;
        let route = entity.route.as_mut()?;
        let from = entity.position;
        let step = route.step(&mut entity.position, &self.volume);
        if matches!(step, RouteStep::Moved(_)) {
            self.spatial.note_moved(id, from);
        }
        Some((from, step))
    }

    /// Replace (or with `None`, drop) an actor's route
    pub fn set_route(&mut self, id: ActorId, route: Option<Route>) {
        if let Some(entity) = self.actors.get_mut(id).and_then(Actor::as_entity_mut) {
            entity.route = route;
        }
    }

    pub fn spatial(&self) -> &ActorIndex {
        &self.spatial
    }

    /// Actors whose indexed position lies in `region`
    pub fn actors_in(&self, region: Region) -> impl Iterator<Item = (ActorId, Position)> + '_ {
        self.spatial.query_region(region.lo, region.hi)
    }

    /// Visit every actor indexed inside `region`
    pub fn for_each_actor_in<F>(&self, region: Region, mut f: F)
    where
        F: FnMut(&Actor),
    {
        for (id, _) in self.spatial.query_region(region.lo, region.hi) {
            if let Some(actor) = self.actors.get(id) {
                f(actor);
            }
        }
    }

    pub fn actors_at(&self, pos: Position) -> &[ActorId] {
        self.spatial.query_point(pos)
    }

    //
    // Inanimate objects
    //

    pub fn spawn_object(&mut self, pos: Position, kind: InanimateKind) -> ObjectId {
        self.objects.spawn(pos, kind)
    }

    pub fn objects(&self) -> &WorldObjects {
        &self.objects
    }

    pub fn objects_in(&self, region: Region) -> impl Iterator<Item = (InanimateObject, Position)> + '_ {
        self.objects.in_region(region.lo, region.hi)
    }

    //
    // Terrain
    //

    pub fn volume(&self) -> &VoxelVolume {
        &self.volume
    }

    pub fn get_voxel(&self, pos: Position) -> Voxel {
        self.volume.get_voxel(pos)
    }

    pub fn set_voxel(&mut self, pos: Position, voxel: Voxel) {
        if self.volume.set_voxel(pos, voxel) {
            self.force_update_terrain_mesh = true;
        }
    }

    pub fn fill(&mut self, region: Region, voxel: Voxel) {
        self.volume.fill(region, voxel);
        self.force_update_terrain_mesh = true;
    }

    /// Voxel directly beneath `pos` (gravity side)
    pub fn get_under(&self, pos: Position) -> Voxel {
        self.volume.get_voxel(pos + DOWN)
    }

    pub fn is_mineable(&self, pos: Position) -> bool {
        self.volume.bounds().contains(pos) && self.volume.get_voxel(pos).is_solid()
    }

    /// Dig out a voxel. Rock has a chance to leave a boulder behind.
    pub fn mine_voxel(&mut self, pos: Position) -> MineOutcome {
        let outcome = dig(
            &mut self.volume,
            &mut self.objects,
            self.config.rock_drop_chance,
            pos,
            &mut self.rng,
        );
        self.note_dug(outcome)
    }

    /// `mine_voxel` with the drop roll taken from `rng`
    pub fn mine_voxel_with<R: Rng>(&mut self, pos: Position, rng: &mut R) -> MineOutcome {
        let outcome = dig(
            &mut self.volume,
            &mut self.objects,
            self.config.rock_drop_chance,
            pos,
            rng,
        );
        self.note_dug(outcome)
    }

    fn note_dug(&mut self, outcome: MineOutcome) -> MineOutcome {
        if matches!(outcome, MineOutcome::Mined { .. }) {
            self.force_update_terrain_mesh = true;
        }
        outcome
    }

    /// Returns and clears the terrain-changed flag
    pub fn take_terrain_dirty(&mut self) -> bool {
        std::mem::take(&mut self.force_update_terrain_mesh)
    }

    //
    // Orders
    //

    pub fn orders(&self) -> &OrderRegistry {
        &self.orders
    }

    pub(crate) fn orders_mut(&mut self) -> &mut OrderRegistry {
        &mut self.orders
    }

    pub fn have_orders(&self) -> bool {
        self.orders.have_orders()
    }

    pub fn add_order(&mut self, draft: OrderDraft) -> Result<OrderId> {
        self.orders.add(draft)
    }

    /// Pick an order for `actor` at the current step; see `OrderRegistry::select_for`
    pub fn get_random_order(&mut self, actor: ActorId) -> Option<Arc<Order>> {
        let sensors = Sensors::new(&self.actors, &self.volume);
        self.orders
            .select_for(actor, self.current_tick, &sensors, &mut self.rng)
    }

    /// Designate cells for digging
    ///
    /// With an anchor, issues one order per cell of the x/z rectangle between
    /// anchor and cursor, on the cursor's layer. Without one, a single order
    /// for the cursor cell. Cells outside the volume are skipped. Either every
    /// order is registered or, if the registry lacks room, none is.
    pub fn add_mining_goal(&mut self, anchor: Option<Position>, cursor: Position) -> Result<Vec<OrderId>> {
        let (cells, target_kind): (Vec<Position>, _) = match anchor {
            Some(anchor) => (
                Region::from_corners(anchor, cursor).layer_cells(cursor.y).collect(),
                TargetKind::Area,
            ),
            None => (vec![cursor], TargetKind::Position),
        };

        let bounds = self.volume.bounds();
        let (cells, outside): (Vec<Position>, Vec<Position>) =
            cells.into_iter().partition(|&cell| bounds.contains(cell));
        if !outside.is_empty() {
            tracing::warn!(skipped = outside.len(), "mining designation outside the world ignored");
        }

        if let Some(room) = self.orders.remaining_capacity() {
            if cells.len() > room {
                tracing::warn!(wanted = cells.len(), room, "order registry cannot take the designation");
                return Err(DelveError::RegistryFull {
                    capacity: self.config.order_capacity.unwrap_or_default(),
                });
            }
        }

        let mut ids = Vec::with_capacity(cells.len());
        for cell in cells {
            ids.push(self.add_order(OrderDraft::mine(cell, target_kind))?);
        }
        tracing::debug!(count = ids.len(), y = cursor.y, "designated mining area");
        Ok(ids)
    }

    /// Order is done; stop handing it out
    pub fn report_fulfilled(&mut self, id: OrderId, result: PlanResult) {
        tracing::info!(order = %id, %result, "world: order fulfilled");
        self.orders.remove(id);
    }

    /// Order attempt failed; lower its priority
    pub fn report_failed(&mut self, id: OrderId, result: PlanResult) -> Option<Tier> {
        let tier = self.orders.demote(id);
        tracing::info!(order = %id, %result, ?tier, "world: order failed");
        tier
    }

    /// Actor cannot do the order at all; lower its priority
    pub fn report_impossible(&mut self, id: OrderId, result: PlanResult) -> Option<Tier> {
        let tier = self.orders.demote(id);
        tracing::info!(order = %id, %result, ?tier, "world: order impossible");
        tier
    }

    /// Dispatch a report to the matching callback
    pub fn apply_report(&mut self, report: OrderReport) -> Option<Tier> {
        match report.kind {
            ReportKind::Fulfilled => {
                self.report_fulfilled(report.order, report.result);
                None
            }
            ReportKind::Failed => self.report_failed(report.order, report.result),
            ReportKind::Impossible => self.report_impossible(report.order, report.result),
        }
    }

    //
    // Sensors
    //

    pub fn sensors(&self) -> Sensors<'_> {
        Sensors::new(&self.actors, &self.volume)
    }

    pub fn read_metric(&self, metric: &Metric, ctx: &Context) -> Metric {
        self.sensors().read_metric(metric, ctx)
    }

    pub fn get_current_situation(&self, desired: &[Metric], ctx: &Context) -> Vec<Metric> {
        self.sensors().current_situation(desired, ctx)
    }

    pub fn conditions_stand_true(&self, goal: &[Metric], ctx: &Context) -> bool {
        self.sensors().conditions_stand_true(goal, ctx)
    }
}

/// Remove a solid in-bounds voxel, rolling d100 for a boulder if it was rock
fn dig<R: Rng>(
    volume: &mut VoxelVolume,
    objects: &mut WorldObjects,
    rock_drop_chance: u32,
    pos: Position,
    rng: &mut R,
) -> MineOutcome {
    if !volume.bounds().contains(pos) {
        tracing::debug!(?pos, "can't mine - outside the world");
        return MineOutcome::OutOfBounds;
    }
    let voxel = volume.get_voxel(pos);
    if !voxel.is_solid() {
        tracing::debug!(?pos, ?voxel, "can't mine - not solid");
        return MineOutcome::NotSolid;
    }

    let mut dropped = None;
    if voxel.is_rock() && rng.gen_range(0..100) < rock_drop_chance {
        dropped = Some(objects.spawn(pos, InanimateKind::Boulder));
    }

    volume.set_voxel(pos, Voxel::Air);
    MineOutcome::Mined { dropped }
}

impl Default for World {
    fn default() -> Self {
        let config = SimulationConfig::default();
        let bounds = Region::from_corners(config.world_bounds.lo(), config.world_bounds.hi());
        Self::with_volume(config, VoxelVolume::new(bounds, Voxel::Rock))
    }
}
