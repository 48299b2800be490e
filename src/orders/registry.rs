//! Tiered order registry and the order scheduler
//!
//! Orders live in exactly one of three tiers. Fresh orders start in the
//! normal tier; failure reports push them down one tier at a time, so orders
//! that keep failing are offered less often but never dropped. Only a
//! fulfilment report (or finding the goal already met) removes an order.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::config::SimulationConfig;
use crate::core::error::{DelveError, Result};
use crate::core::types::{ActorId, OrderId, Tick};
use crate::goals::sensors::Sensors;
use crate::orders::order::{Order, OrderDraft};

/// Priority tier of an outstanding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Normal,
    Low,
    VeryLow,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Normal, Tier::Low, Tier::VeryLow];

    fn index(self) -> usize {
        self as usize
    }

    /// Next tier down; `VeryLow` is terminal
    pub fn lower(self) -> Tier {
        match self {
            Tier::Normal => Tier::Low,
            Tier::Low | Tier::VeryLow => Tier::VeryLow,
        }
    }
}

pub type OrderMap = BTreeMap<OrderId, Arc<Order>>;

/// What the player desires, split by priority
#[derive(Debug, Clone)]
pub struct OrderRegistry {
    tiers: [OrderMap; 3],
    next_id: u64,
    low_prio_every: u64,
    very_low_prio_every: u64,
    capacity: Option<usize>,
    /// Orders evicted by selection since the last `take_evicted`
    evicted: Vec<OrderId>,
}

impl OrderRegistry {
    pub const LOW_PRIO_ORDERS_EVERY: u64 = 3;
    pub const VERY_LOW_PRIO_ORDERS_EVERY: u64 = 6;

    pub fn new() -> Self {
        Self::with_cadence(Self::LOW_PRIO_ORDERS_EVERY, Self::VERY_LOW_PRIO_ORDERS_EVERY)
    }

    pub fn with_cadence(low_prio_every: u64, very_low_prio_every: u64) -> Self {
        Self {
            tiers: Default::default(),
            next_id: 0,
            low_prio_every: low_prio_every.max(1),
            very_low_prio_every: very_low_prio_every.max(1),
            capacity: None,
            evicted: Vec::new(),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        let mut registry =
            Self::with_cadence(config.low_prio_orders_every, config.very_low_prio_orders_every);
        registry.capacity = config.order_capacity;
        registry
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Orders that can still be added, `None` when unbounded
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.capacity.map(|capacity| capacity.saturating_sub(self.len()))
    }

    /// Register a new order in the normal tier
    pub fn add(&mut self, draft: OrderDraft) -> Result<OrderId> {
        if let Some(capacity) = self.capacity {
            if self.len() >= capacity {
                return Err(DelveError::RegistryFull { capacity });
            }
        }
        let id = OrderId(self.next_id);
        self.next_id += 1;
        self.tiers[Tier::Normal.index()].insert(id, Arc::new(Order::from_draft(id, draft)));
        Ok(id)
    }

    /// Remove `id` from whichever tier holds it
    pub fn remove(&mut self, id: OrderId) -> Option<Arc<Order>> {
        self.tiers.iter_mut().find_map(|tier| tier.remove(&id))
    }

    /// Move `id` one tier down, returns its new tier
    pub fn demote(&mut self, id: OrderId) -> Option<Tier> {
        let from = self.tier_of(id)?;
        let to = from.lower();
        if from != to {
            let order = self.tiers[from.index()].remove(&id)?;
            self.tiers[to.index()].insert(id, order);
        }
        Some(to)
    }

    pub fn get(&self, id: OrderId) -> Option<&Arc<Order>> {
        self.tiers.iter().find_map(|tier| tier.get(&id))
    }

    pub fn tier_of(&self, id: OrderId) -> Option<Tier> {
        Tier::ALL
            .into_iter()
            .find(|t| self.tiers[t.index()].contains_key(&id))
    }

    /// Orders of one tier in id order
    pub fn tier(&self, tier: Tier) -> impl Iterator<Item = &Arc<Order>> {
        self.tiers[tier.index()].values()
    }

    pub fn len_tier(&self, tier: Tier) -> usize {
        self.tiers[tier.index()].len()
    }

    pub fn len(&self) -> usize {
        self.tiers.iter().map(|t| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        !self.have_orders()
    }

    /// Check if any orders are available
    pub fn have_orders(&self) -> bool {
        self.tiers.iter().any(|t| !t.is_empty())
    }

    /// Drain the ids evicted by selection since the last call
    pub fn take_evicted(&mut self) -> Vec<OrderId> {
        std::mem::take(&mut self.evicted)
    }

    /// Whether `order`'s goal already holds for `actor`
    pub fn goal_satisfied(&self, order: &Order, actor: ActorId, sensors: &Sensors<'_>) -> bool {
        let ctx = order.context.bound_to(actor);
        sensors.conditions_stand_true(&order.goal, &ctx)
    }

    /// Pick an order to offer to `actor` at simulation step `step`
    ///
    /// Every `very_low_prio_every` steps the very-low tier is served first,
    /// every `low_prio_every` steps the low tier; otherwise, and whenever
    /// those come up empty, tiers are tried from normal down. The returned
    /// order stays registered so other actors may be offered it too.
    pub fn select_for<R: Rng>(
        &mut self,
        actor: ActorId,
        step: Tick,
        sensors: &Sensors<'_>,
        rng: &mut R,
    ) -> Option<Arc<Order>> {
        if step % self.very_low_prio_every == 0 {
            if let Some(order) = self.pick_from(Tier::VeryLow, actor, sensors, rng) {
                return Some(order);
            }
        }
        if step % self.low_prio_every == 0 {
            if let Some(order) = self.pick_from(Tier::Low, actor, sensors, rng) {
                return Some(order);
            }
        }
        for tier in Tier::ALL {
            if let Some(order) = self.pick_from(tier, actor, sensors, rng) {
                return Some(order);
            }
        }
        None
    }

    /// Pick a random order from one tier, evicting those already fulfilled
    // TODO: prefer orders located closer to the actor
    fn pick_from<R: Rng>(
        &mut self,
        tier: Tier,
        actor: ActorId,
        sensors: &Sensors<'_>,
        rng: &mut R,
    ) -> Option<Arc<Order>> {
        loop {
            let map = &self.tiers[tier.index()];
            if map.is_empty() {
                return None;
            }
            let nth = rng.gen_range(0..map.len());
            let order = map.values().nth(nth).map(Arc::clone)?;

            if self.goal_satisfied(&order, actor, sensors) {
                // Fulfilled by someone else or by the world itself
                tracing::debug!(order = %order.id, ?tier, "order conditions stand true, evicting");
                self.tiers[tier.index()].remove(&order.id);
                self.evicted.push(order.id);
                continue;
            }
            return Some(order);
        }
    }
}

impl Default for OrderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Position;
    use crate::ecs::actor::{ActorDraft, Actors};
    use crate::orders::order::TargetKind;
    use crate::spatial::region::Region;
    use crate::world::volume::VoxelVolume;
    use crate::world::voxel::Voxel;
    use rand::rngs::mock::StepRng;

    fn world_parts() -> (Actors, VoxelVolume) {
        let mut actors = Actors::new();
        actors.insert(ActorDraft::new("a").with_position(Position::ZERO).into_actor(ActorId(0)));
        let mut volume = VoxelVolume::new(
            Region::from_corners(Position::splat(-8), Position::splat(8)),
            Voxel::Rock,
        );
        volume.fill(
            Region::from_corners(Position::new(0, 1, 0), Position::new(7, 1, 7)),
            Voxel::Rock,
        );
        (actors, volume)
    }

    fn rock_order(x: i32) -> OrderDraft {
        OrderDraft::mine(Position::new(x, 1, 0), TargetKind::Position)
    }

    #[test]
    fn test_add_goes_to_normal_tier() {
        let mut registry = OrderRegistry::new();
        let id = registry.add(rock_order(0)).unwrap();
        assert_eq!(registry.tier_of(id), Some(Tier::Normal));
        assert_eq!(registry.len_tier(Tier::Normal), 1);
        assert!(registry.have_orders());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut registry = OrderRegistry::new();
        let a = registry.add(rock_order(0)).unwrap();
        let b = registry.add(rock_order(0)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_demote_walks_down_one_tier() {
        let mut registry = OrderRegistry::new();
        let id = registry.add(rock_order(0)).unwrap();
        assert_eq!(registry.demote(id), Some(Tier::Low));
        assert_eq!(registry.demote(id), Some(Tier::VeryLow));
        assert_eq!(registry.demote(id), Some(Tier::VeryLow));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.len_tier(Tier::VeryLow), 1);
    }

    #[test]
    fn test_demote_unknown_is_noop() {
        let mut registry = OrderRegistry::new();
        assert_eq!(registry.demote(OrderId(42)), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_from_any_tier() {
        let mut registry = OrderRegistry::new();
        let id = registry.add(rock_order(0)).unwrap();
        registry.demote(id);
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert_eq!(registry.tier_of(id), None);
    }

    #[test]
    fn test_capacity_rejects_overflow() {
        let mut registry = OrderRegistry::new().with_capacity(1);
        registry.add(rock_order(0)).unwrap();
        let err = registry.add(rock_order(1)).unwrap_err();
        assert!(matches!(err, DelveError::RegistryFull { capacity: 1 }));
    }

    #[test]
    fn test_select_keeps_unsatisfied_order() {
        let (actors, volume) = world_parts();
        let sensors = Sensors::new(&actors, &volume);
        let mut registry = OrderRegistry::new();
        let id = registry.add(rock_order(2)).unwrap();

        let picked = registry.select_for(ActorId(0), 1, &sensors, &mut StepRng::new(0, 0));
        assert_eq!(picked.map(|o| o.id), Some(id));
        // Offering does not remove
        assert_eq!(registry.tier_of(id), Some(Tier::Normal));
    }

    #[test]
    fn test_select_evicts_satisfied_orders() {
        let (actors, volume) = world_parts();
        let sensors = Sensors::new(&actors, &volume);
        let mut registry = OrderRegistry::new();
        // (0, 0, 0) is air: already satisfied
        let done = registry
            .add(OrderDraft::mine(Position::ZERO, TargetKind::Position))
            .unwrap();
        let open = registry.add(rock_order(3)).unwrap();

        let picked = registry.select_for(ActorId(0), 1, &sensors, &mut StepRng::new(0, 0));
        assert_eq!(picked.map(|o| o.id), Some(open));
        assert_eq!(registry.tier_of(done), None);
        assert_eq!(registry.take_evicted(), vec![done]);
        assert!(registry.take_evicted().is_empty());
    }

    #[test]
    fn test_normal_tier_preferred_off_cadence() {
        let (actors, volume) = world_parts();
        let sensors = Sensors::new(&actors, &volume);
        let mut registry = OrderRegistry::new();
        let low = registry.add(rock_order(0)).unwrap();
        registry.demote(low);
        let normal = registry.add(rock_order(1)).unwrap();

        let picked = registry.select_for(ActorId(0), 1, &sensors, &mut StepRng::new(0, 0));
        assert_eq!(picked.map(|o| o.id), Some(normal));
    }

    #[test]
    fn test_low_tier_served_on_its_cadence() {
        let (actors, volume) = world_parts();
        let sensors = Sensors::new(&actors, &volume);
        let mut registry = OrderRegistry::new();
        let low = registry.add(rock_order(0)).unwrap();
        registry.demote(low);
        registry.add(rock_order(1)).unwrap();

        let picked = registry.select_for(ActorId(0), 3, &sensors, &mut StepRng::new(0, 0));
        assert_eq!(picked.map(|o| o.id), Some(low));
    }

    #[test]
    fn test_very_low_tier_served_first_on_its_cadence() {
        let (actors, volume) = world_parts();
        let sensors = Sensors::new(&actors, &volume);
        let mut registry = OrderRegistry::new();
        let very_low = registry.add(rock_order(0)).unwrap();
        registry.demote(very_low);
        registry.demote(very_low);
        let low = registry.add(rock_order(1)).unwrap();
        registry.demote(low);
        registry.add(rock_order(2)).unwrap();

        let mut rng = StepRng::new(0, 0);
        assert_eq!(registry.select_for(ActorId(0), 6, &sensors, &mut rng).map(|o| o.id), Some(very_low));
        assert_eq!(registry.select_for(ActorId(0), 9, &sensors, &mut rng).map(|o| o.id), Some(low));
    }

    #[test]
    fn test_falls_through_to_lower_tiers() {
        let (actors, volume) = world_parts();
        let sensors = Sensors::new(&actors, &volume);
        let mut registry = OrderRegistry::new();
        let id = registry.add(rock_order(0)).unwrap();
        registry.demote(id);
        registry.demote(id);

        let picked = registry.select_for(ActorId(0), 1, &sensors, &mut StepRng::new(0, 0));
        assert_eq!(picked.map(|o| o.id), Some(id));
    }

    #[test]
    fn test_select_on_empty_registry() {
        let (actors, volume) = world_parts();
        let sensors = Sensors::new(&actors, &volume);
        let mut registry = OrderRegistry::new();
        assert!(registry.select_for(ActorId(0), 0, &sensors, &mut StepRng::new(0, 0)).is_none());
    }
}
