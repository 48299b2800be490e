//! Inanimate world objects (dropped resources) storage and queries

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::{ObjectId, Position};
use crate::spatial::point_multimap::PointMultimap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InanimateKind {
    Boulder,
    Wood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InanimateObject {
    pub id: ObjectId,
    pub kind: InanimateKind,
}

/// Storage for all inanimate objects lying in the world
#[derive(Debug, Clone, Default)]
pub struct WorldObjects {
    /// All objects by ID
    objects: AHashMap<ObjectId, (InanimateObject, Position)>,
    spatial: PointMultimap<ObjectId>,
    next_id: u64,
}

impl WorldObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new object at `pos`
    pub fn spawn(&mut self, pos: Position, kind: InanimateKind) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, (InanimateObject { id, kind }, pos));
        self.spatial.insert(id, pos);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<(InanimateObject, Position)> {
        self.objects.get(&id).copied()
    }

    /// Remove an object (picked up, destroyed)
    pub fn remove(&mut self, id: ObjectId) -> Option<InanimateObject> {
        let (object, pos) = self.objects.remove(&id)?;
        self.spatial.remove(id, pos);
        Some(object)
    }

    pub fn at(&self, pos: Position) -> impl Iterator<Item = InanimateObject> + '_ {
        self.spatial
            .query_point(pos)
            .iter()
            .filter_map(|id| self.objects.get(id).map(|(o, _)| *o))
    }

    /// Objects inside the inclusive box `lo..=hi`, in cell order
    pub fn in_region(&self, lo: Position, hi: Position) -> impl Iterator<Item = (InanimateObject, Position)> + '_ {
        self.spatial
            .query_region(lo, hi)
            .filter_map(|(id, pos)| self.objects.get(&id).map(|(o, _)| (*o, pos)))
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
