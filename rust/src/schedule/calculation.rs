//! Pure schedule computation: graph build, ordering, forward pass and diff.

use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::{DateUpdate, ScheduledDates, TaskId, TaskRecord};
use crate::{log_changes, log_checks};

use super::forward_pass::forward_pass;
use super::graph::ScheduleGraph;
use super::ordering::topological_order;

/// Everything one computation produces, before any write-back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComputedSchedule {
    /// Computed dates for every ordered task, in topological order.
    pub scheduled: Vec<(TaskId, ScheduledDates)>,
    /// Tasks whose computed dates differ from the stored ones.
    pub updates: Vec<DateUpdate>,
    /// Tasks in or downstream of a cycle, in load order.
    pub skipped: Vec<TaskId>,
    /// Distinct tasks considered.
    pub total_count: usize,
}

impl ComputedSchedule {
    pub fn ordered_count(&self) -> usize {
        self.scheduled.len()
    }

    /// Computed dates for one task, if it was ordered.
    pub fn dates_for(&self, task_id: &TaskId) -> Option<ScheduledDates> {
        self.scheduled
            .iter()
            .find(|(id, _)| id == task_id)
            .map(|(_, dates)| *dates)
    }
}

/// Compute the earliest schedule for a task set.
///
/// `reference_date` anchors tasks that have neither predecessors nor a
/// constraint. The result is a pure function of `(tasks, reference_date)`.
pub fn compute_schedule(
    tasks: &[TaskRecord],
    reference_date: NaiveDate,
    config: &EngineConfig,
) -> Result<ComputedSchedule, EngineError> {
    let verbosity = config.verbosity;
    let graph = ScheduleGraph::build(tasks, verbosity);
    if graph.is_empty() {
        return Ok(ComputedSchedule::default());
    }

    let topo = topological_order(&graph);
    let skipped: Vec<TaskId> = topo
        .excluded
        .iter()
        .map(|&idx| graph.task_id(idx).clone())
        .collect();
    if !skipped.is_empty() {
        tracing::warn!(
            skipped = skipped.len(),
            total = graph.len(),
            "dependency cycle: tasks left unscheduled"
        );
    }

    let dates = forward_pass(&graph, &topo.order, reference_date, verbosity)?;

    let mut scheduled = Vec::with_capacity(topo.order.len());
    let mut updates = Vec::new();
    for &idx in &topo.order {
        let i = idx as usize;
        let Some(computed) = dates[i] else {
            continue;
        };
        let task_id = graph.task_id(idx);
        let (stored_start, stored_end) = graph.stored[i];

        if stored_start == Some(computed.start_date) && stored_end == Some(computed.end_date) {
            log_checks!(verbosity, task_id = %task_id, "dates unchanged");
        } else {
            log_changes!(
                verbosity,
                task_id = %task_id,
                start = %computed.start_date,
                end = %computed.end_date,
                "queued date update"
            );
            updates.push(DateUpdate {
                task_id: task_id.clone(),
                start_date: computed.start_date,
                end_date: computed.end_date,
            });
        }
        scheduled.push((task_id.clone(), computed));
    }

    Ok(ComputedSchedule {
        scheduled,
        updates,
        skipped,
        total_count: graph.len(),
    })
}
