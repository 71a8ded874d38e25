//! Critical path date propagation over a task dependency graph.
//!
//! A run builds a [`ScheduleGraph`] from one bulk load, orders it with Kahn's
//! algorithm (cyclic parts are set aside, not fatal), computes earliest dates
//! in a single forward pass and diffs them against the stored dates.

mod calculation;
mod forward_pass;
mod graph;
mod ordering;

pub use calculation::{compute_schedule, ComputedSchedule};
pub use forward_pass::forward_pass;
pub use graph::{Constraint, GraphEdge, ScheduleGraph};
pub use ordering::{topological_order, TopoOrder};
