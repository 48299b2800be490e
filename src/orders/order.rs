//! Orders: shared goals that actors adopt and report back on

use serde::{Deserialize, Serialize};

use crate::core::types::{OrderId, PlanResult, Position};
use crate::goals::metric::{Context, Metric};

/// What an order points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    /// Part of an area designation (dig these halls)
    Area,
    /// A single cell (dig here)
    Position,
    /// An entity (kill target)
    Entity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobKind {
    /// Remove cells, preserving walls, ceiling and floor
    Mine,
}

/// An order as issued, before the registry assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub goal: Vec<Metric>,
    pub context: Context,
    pub target_kind: TargetKind,
    pub job_kind: JobKind,
}

impl OrderDraft {
    /// Single-cell mining order: the cell must end up not solid
    pub fn mine(pos: Position, target_kind: TargetKind) -> Self {
        Self {
            goal: vec![Metric::block_cleared(pos)],
            context: Context::at(pos),
            target_kind,
            job_kind: JobKind::Mine,
        }
    }
}

/// An outstanding order
///
/// Immutable once registered; shared with every actor it is offered to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Conjunction: satisfied only if every metric reads its desired value
    pub goal: Vec<Metric>,
    pub context: Context,
    pub target_kind: TargetKind,
    pub job_kind: JobKind,
}

impl Order {
    pub fn from_draft(id: OrderId, draft: OrderDraft) -> Self {
        Self {
            id,
            goal: draft.goal,
            context: draft.context,
            target_kind: draft.target_kind,
            job_kind: draft.job_kind,
        }
    }

    /// Target cell of the order
    pub fn position(&self) -> Position {
        self.context.position
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportKind {
    /// Goal reached; the order is retired everywhere
    Fulfilled,
    /// Attempt failed; the order is demoted one tier
    Failed,
    /// Actor cannot do this at all; the order is demoted one tier
    Impossible,
}

/// Outcome an actor sends back about an order it adopted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReport {
    pub order: OrderId,
    pub kind: ReportKind,
    pub result: PlanResult,
}

impl OrderReport {
    pub fn fulfilled(order: OrderId, result: PlanResult) -> Self {
        Self { order, kind: ReportKind::Fulfilled, result }
    }

    pub fn failed(order: OrderId, result: PlanResult) -> Self {
        Self { order, kind: ReportKind::Failed, result }
    }

    pub fn impossible(order: OrderId, result: PlanResult) -> Self {
        Self { order, kind: ReportKind::Impossible, result }
    }
}
