//! Python bindings for the pure schedule computation.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::models::{ConstraintType, Predecessor, TaskId, TaskRecord};
use crate::schedule;

/// Task with its predecessor edges (PyO3 wrapper).
#[pyclass(name = "Task")]
#[derive(Clone, Debug)]
pub struct PyTask {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub duration_days: u32,
    #[pyo3(get, set)]
    pub is_milestone: bool,
    #[pyo3(get, set)]
    pub constraint_type: Option<String>,
    #[pyo3(get, set)]
    pub constraint_date: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub start_date: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub end_date: Option<NaiveDate>,
    /// (predecessor_id, dependency_type, lag_days)
    #[pyo3(get, set)]
    pub predecessors: Vec<(String, String, i64)>,
}

#[pymethods]
impl PyTask {
    #[new]
    #[pyo3(signature = (
        id,
        duration_days,
        predecessors=Vec::new(),
        is_milestone=false,
        constraint_type=None,
        constraint_date=None,
        start_date=None,
        end_date=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        id: String,
        duration_days: u32,
        predecessors: Vec<(String, String, i64)>,
        is_milestone: bool,
        constraint_type: Option<String>,
        constraint_date: Option<NaiveDate>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id,
            duration_days,
            is_milestone,
            constraint_type,
            constraint_date,
            start_date,
            end_date,
            predecessors,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, duration_days={}, milestone={}, preds={})",
            self.id,
            self.duration_days,
            self.is_milestone,
            self.predecessors.len()
        )
    }
}

impl From<PyTask> for TaskRecord {
    fn from(task: PyTask) -> Self {
        Self {
            id: TaskId(task.id),
            duration_days: task.duration_days,
            is_milestone: task.is_milestone,
            constraint_type: ConstraintType::from_stored(task.constraint_type.as_deref()),
            constraint_date: task.constraint_date,
            start_date: task.start_date,
            end_date: task.end_date,
            predecessors: task
                .predecessors
                .into_iter()
                .map(|(id, kind, lag)| Predecessor::from_stored(id, &kind, lag))
                .collect(),
        }
    }
}

/// Outcome of a schedule computation (PyO3 wrapper).
#[pyclass(name = "ScheduleResult")]
#[derive(Clone, Debug, Default)]
pub struct PyScheduleResult {
    /// task_id -> (start_date, end_date) for every ordered task
    #[pyo3(get)]
    pub scheduled: HashMap<String, (NaiveDate, NaiveDate)>,
    /// Task IDs whose computed dates differ from their stored dates
    #[pyo3(get)]
    pub changed_task_ids: Vec<String>,
    #[pyo3(get)]
    pub ordered_count: usize,
    #[pyo3(get)]
    pub total_count: usize,
    #[pyo3(get)]
    pub skipped_task_ids: Vec<String>,
}

#[pymethods]
impl PyScheduleResult {
    fn __repr__(&self) -> String {
        format!(
            "ScheduleResult(ordered={}, total={}, changed={}, skipped={})",
            self.ordered_count,
            self.total_count,
            self.changed_task_ids.len(),
            self.skipped_task_ids.len()
        )
    }
}

/// Compute earliest start/finish dates for a task set.
///
/// # Arguments
/// * `tasks` - Tasks with their predecessor edges
/// * `reference_date` - Anchor date for tasks with no predecessors and no constraint
/// * `verbosity` - 0=silent, 1=changes, 2=checks, 3=debug
///
/// # Raises
/// * ValueError if a computed date leaves the supported calendar range
#[pyfunction]
#[pyo3(signature = (tasks, reference_date, verbosity=0))]
fn compute_schedule(
    tasks: Vec<PyTask>,
    reference_date: NaiveDate,
    verbosity: u8,
) -> PyResult<PyScheduleResult> {
    let records: Vec<TaskRecord> = tasks.into_iter().map(TaskRecord::from).collect();
    let config = EngineConfig::default().with_verbosity(verbosity);

    let computed = schedule::compute_schedule(&records, reference_date, &config)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;

    Ok(PyScheduleResult {
        ordered_count: computed.ordered_count(),
        total_count: computed.total_count,
        scheduled: computed
            .scheduled
            .into_iter()
            .map(|(id, dates)| (id.0, (dates.start_date, dates.end_date)))
            .collect(),
        changed_task_ids: computed.updates.into_iter().map(|u| u.task_id.0).collect(),
        skipped_task_ids: computed.skipped.into_iter().map(|id| id.0).collect(),
    })
}

/// The cascade_engine Python module.
#[pymodule]
fn cascade_engine(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyTask>()?;
    m.add_class::<PyScheduleResult>()?;
    m.add_function(wrap_pyfunction!(compute_schedule, m)?)?;
    Ok(())
}
