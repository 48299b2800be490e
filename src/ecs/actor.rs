//! Actors: an id with a fixed set of optional capabilities

use std::collections::BTreeMap;

use crate::core::types::{ActorId, Position};
use crate::entity::body::Body;
use crate::entity::brains::Brains;
use crate::entity::route::Route;

/// Capability kinds an actor may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Entity,
    Body,
    Brains,
}

/// Placement in the world plus any route in progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityState {
    pub position: Position,
    pub route: Option<Route>,
}

impl EntityState {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            route: None,
        }
    }
}

#[derive(Debug)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub entity: Option<EntityState>,
    pub body: Option<Body>,
    pub brains: Option<Box<dyn Brains>>,
}

impl Actor {
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Entity => self.entity.is_some(),
            Capability::Body => self.body.is_some(),
            Capability::Brains => self.brains.is_some(),
        }
    }

    pub fn as_entity(&self) -> Option<&EntityState> {
        self.entity.as_ref()
    }

    pub fn as_entity_mut(&mut self) -> Option<&mut EntityState> {
        self.entity.as_mut()
    }

    pub fn as_body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn as_brains(&self) -> Option<&dyn Brains> {
        self.brains.as_deref()
    }

    pub fn position(&self) -> Option<Position> {
        self.entity.as_ref().map(|e| e.position)
    }
}

/// Everything needed to spawn an actor; the world assigns the id
#[derive(Debug, Default)]
pub struct ActorDraft {
    pub name: String,
    pub position: Option<Position>,
    pub body: Option<Body>,
    pub brains: Option<Box<dyn Brains>>,
}

impl ActorDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_position(mut self, pos: Position) -> Self {
        self.position = Some(pos);
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_brains(mut self, brains: Box<dyn Brains>) -> Self {
        self.brains = Some(brains);
        self
    }

    pub(crate) fn into_actor(self, id: ActorId) -> Actor {
        Actor {
            id,
            name: self.name,
            entity: self.position.map(EntityState::at),
            body: self.body,
            brains: self.brains,
        }
    }
}

/// Owning actor storage, iterated in ascending id order
#[derive(Debug, Default)]
pub struct Actors {
    actors: BTreeMap<ActorId, Actor>,
}

impl Actors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor: Actor) {
        self.actors.insert(actor.id, actor);
    }

    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Snapshot of all ids, for passes that mutate actors while iterating
    pub fn ids(&self) -> Vec<ActorId> {
        self.actors.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
