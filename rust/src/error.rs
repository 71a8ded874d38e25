//! Error types for loading, computing and persisting schedules.

use thiserror::Error;

use crate::models::{ProjectId, TaskId};

/// Errors reported by a [`TaskStore`](crate::TaskStore) implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),
    #[error("Task store failure: {0}")]
    Backend(String),
}

/// Errors that can occur during a recalculation run.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to load tasks: {0}")]
    Load(#[from] StoreError),
    #[error("Failed to write dates for task {task_id} after {written} successful writes: {source}")]
    Write {
        task_id: TaskId,
        written: usize,
        #[source]
        source: StoreError,
    },
    #[error("Computed date for task {task_id} is outside the supported calendar range")]
    DateOutOfRange { task_id: TaskId },
}

impl EngineError {
    /// Store error behind a load or write failure, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Load(err) | Self::Write { source: err, .. } => Some(err),
            Self::DateOutOfRange { .. } => None,
        }
    }
}
