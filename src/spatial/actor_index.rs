//! Spatial index of actor positions with deferred relocation
//!
//! During a pass over all actors, moves are only recorded. The index keeps
//! answering queries with the state it had when the pass started, and the
//! recorded moves are applied in one batch once the pass is complete.

use ahash::AHashMap;
use std::collections::BTreeMap;

use crate::core::types::{ActorId, Position};
use crate::spatial::point_multimap::PointMultimap;

/// Position-keyed index of actors
#[derive(Debug, Clone, Default)]
pub struct ActorIndex {
    cells: PointMultimap<ActorId>,
    /// Where each actor is currently indexed
    indexed: AHashMap<ActorId, Position>,
    /// Pass-start position of every actor that moved during the current pass
    pending: BTreeMap<ActorId, Position>,
}

impl ActorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index `actor` at `pos`, replacing any previous entry for it
    pub fn insert(&mut self, actor: ActorId, pos: Position) {
        if let Some(old) = self.indexed.insert(actor, pos) {
            self.cells.remove(actor, old);
        }
        self.cells.insert(actor, pos);
    }

    /// Remove `actor` from `pos`, no-op if it is not indexed there
    pub fn remove(&mut self, actor: ActorId, pos: Position) -> bool {
        if self.indexed.get(&actor) != Some(&pos) {
            return false;
        }
        self.indexed.remove(&actor);
        self.cells.remove(actor, pos)
    }

    /// Immediate relocation, for use outside of a pass
    pub fn relocate(&mut self, actor: ActorId, old: Position, new: Position) {
        if old == new {
            return;
        }
        self.remove(actor, old);
        self.insert(actor, new);
    }

    /// Remove `actor` wherever it is indexed and forget any pending move
    pub fn purge(&mut self, actor: ActorId) -> bool {
        self.pending.remove(&actor);
        match self.indexed.remove(&actor) {
            Some(pos) => self.cells.remove(actor, pos),
            None => false,
        }
    }

    pub fn position_of(&self, actor: ActorId) -> Option<Position> {
        self.indexed.get(&actor).copied()
    }

    pub fn query_point(&self, pos: Position) -> &[ActorId] {
        self.cells.query_point(pos)
    }

    pub fn query_region(&self, lo: Position, hi: Position) -> impl Iterator<Item = (ActorId, Position)> + '_ {
        self.cells.query_region(lo, hi)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActorId, Position)> + '_ {
        self.cells.iter()
    }

    /// Record that `actor` moved away from `old` during the current pass
    ///
    /// Only the first record per actor is kept, so an actor that moves twice
    /// in one pass is relocated once, from its pass-start cell.
    pub fn note_moved(&mut self, actor: ActorId, old: Position) {
        self.pending.entry(actor).or_insert(old);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply all recorded moves; `current` resolves an actor's position now
    ///
    /// Actors that no longer resolve to a position are dropped from the index.
    /// Returns the number of actors whose entry changed.
    pub fn apply_pending<F>(&mut self, current: F) -> usize
    where
        F: Fn(ActorId) -> Option<Position>,
    {
        let pending = std::mem::take(&mut self.pending);
        let mut changed = 0;
        for (actor, old) in pending {
            match current(actor) {
                Some(new) if new == old => {}
                Some(new) => {
                    self.relocate(actor, old, new);
                    changed += 1;
                }
                None => {
                    self.purge(actor);
                    changed += 1;
                }
            }
        }
        if changed > 0 {
            tracing::trace!(changed, "spatial index: applied deferred relocations");
        }
        changed
    }
}
