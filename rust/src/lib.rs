//! Schedule recalculation engine for waterfall and hybrid projects.
//!
//! Computes earliest start/finish dates for a graph of tasks linked by typed,
//! lagged precedence dependencies (FS, SS, FF, SF), honoring per-task date
//! constraints, and writes back only the dates that changed.
//!
//! The pure computation is [`compute_schedule`]; [`ScheduleEngine`] wraps it
//! with loading from and persisting to a [`TaskStore`].

pub mod config;
pub mod engine;
pub mod error;
pub mod interner;
pub mod logging;
pub mod models;
pub mod schedule;
pub mod store;

#[cfg(feature = "python")]
mod python;

pub use config::EngineConfig;
pub use engine::ScheduleEngine;
pub use error::{EngineError, StoreError};
pub use interner::{TaskIdx, TaskIndex};
pub use models::{
    ConstraintType, DateUpdate, DependencyType, Predecessor, ProjectId, RecalcSummary,
    ScheduledDates, TaskId, TaskRecord,
};
pub use schedule::{compute_schedule, ComputedSchedule};
pub use store::{MemoryTaskStore, TaskStore};
