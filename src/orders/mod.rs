//! Orders and the tiered registry that hands them out

pub mod order;
pub mod registry;

pub use order::{JobKind, Order, OrderDraft, OrderReport, ReportKind, TargetKind};
pub use registry::{OrderMap, OrderRegistry, Tier};
