//! Goal metrics, values and evaluation contexts

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::{ActorId, Position};

/// Which sensor a metric reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// Actor stands next to (or on) the context position, same layer
    MeleeRange,
    /// Actor can reach the context position from one layer above
    MeleeRangeDepth,
    HaveHand,
    HaveLeg,
    /// No equipment system yet, always reads true
    HaveMiningPick,
    /// Voxel at the argument position is air or liquid
    BlockIsNotSolid,
}

impl MetricKind {
    /// Whether evaluation needs an actor bound into the context
    pub fn requires_actor(self) -> bool {
        !matches!(self, MetricKind::HaveMiningPick | MetricKind::BlockIsNotSolid)
    }
}

/// Operand or reading of a metric
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Position(Position),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_position(&self) -> Option<Position> {
        match self {
            Value::Position(p) => Some(*p),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Position> for Value {
    fn from(p: Position) -> Self {
        Value::Position(p)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("-"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Position(p) => write!(f, "({}, {}, {})", p.x, p.y, p.z),
        }
    }
}

/// A single condition of a goal
///
/// Goal metrics carry the `desired` value. Evaluation produces a copy with
/// `reading` filled in, or left `None` when the sensor cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub kind: MetricKind,
    pub argument: Value,
    pub desired: Value,
    pub reading: Option<Value>,
}

impl Metric {
    pub fn new(kind: MetricKind, argument: impl Into<Value>, desired: impl Into<Value>) -> Self {
        Self {
            kind,
            argument: argument.into(),
            desired: desired.into(),
            reading: None,
        }
    }

    /// Metric without operand, e.g. `HaveHand == true`
    pub fn flag(kind: MetricKind, desired: bool) -> Self {
        Self::new(kind, Value::None, desired)
    }

    /// `BlockIsNotSolid` at `pos`, desired true
    pub fn block_cleared(pos: Position) -> Self {
        Self::new(MetricKind::BlockIsNotSolid, pos, true)
    }

    /// Copy of this metric with the reading set
    pub fn with_reading(&self, reading: impl Into<Value>) -> Self {
        Self {
            reading: Some(reading.into()),
            ..self.clone()
        }
    }

    /// Copy of this metric with the reading cleared ("cannot evaluate")
    pub fn unread(&self) -> Self {
        Self {
            reading: None,
            ..self.clone()
        }
    }

    /// Whether this evaluated metric meets `goal`
    ///
    /// Compares this reading against the goal's desired value. Not symmetric:
    /// `goal.satisfies(reading)` is meaningless.
    pub fn satisfies(&self, goal: &Metric) -> bool {
        self.kind == goal.kind
            && self.argument == goal.argument
            && self.reading == Some(goal.desired)
    }
}

/// Evaluation binding: which actor, and which target cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub actor: Option<ActorId>,
    pub position: Position,
}

impl Context {
    /// Template context with no actor bound
    pub fn at(position: Position) -> Self {
        Self {
            actor: None,
            position,
        }
    }

    /// Copy of this context bound to `actor`
    pub fn bound_to(&self, actor: ActorId) -> Self {
        Self {
            actor: Some(actor),
            ..*self
        }
    }
}
