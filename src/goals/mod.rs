//! Goal metrics and the sensors that read them

pub mod metric;
pub mod sensors;

pub use metric::{Context, Metric, MetricKind, Value};
pub use sensors::Sensors;
