//! Ordered command output.

mod command;
mod metrics;
mod order;

pub use command::{StrokeCommand, StrokePlan};
pub use metrics::{PlanMetrics, MS_PER_STROKE};
pub use order::CommandOrderer;
