//! In-memory dependency graph built from one bulk load.

use chrono::NaiveDate;

use crate::interner::{TaskIdx, TaskIndex};
use crate::models::{ConstraintType, DependencyType, TaskId, TaskRecord};
use crate::{log_checks, log_debug};

/// A task's own date constraint, resolved to what the forward pass applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constraint {
    None,
    MustStartOn(NaiveDate),
    StartNoEarlierThan(NaiveDate),
}

impl Constraint {
    /// Resolve a stored constraint kind and date.
    ///
    /// Kinds the engine does not interpret, and interpreted kinds with no date,
    /// resolve to `None`.
    pub fn resolve(kind: &ConstraintType, date: Option<NaiveDate>) -> Self {
        match (kind, date) {
            (ConstraintType::MustStartOn, Some(d)) => Self::MustStartOn(d),
            (ConstraintType::StartNoEarlierThan, Some(d)) => Self::StartNoEarlierThan(d),
            _ => Self::None,
        }
    }
}

/// Predecessor edge with the predecessor's attributes copied in at load time.
#[derive(Clone, Debug)]
pub struct GraphEdge {
    pub pred: TaskIdx,
    pub dep_type: DependencyType,
    pub lag_days: i64,
    pub pred_duration: u32,
    pub pred_is_milestone: bool,
    pub pred_constraint: Constraint,
}

/// Dependency graph over the tasks of one recalculation run.
///
/// All per-task data is indexed by [`TaskIdx`], assigned in load order.
#[derive(Clone, Debug, Default)]
pub struct ScheduleGraph {
    pub index: TaskIndex,
    /// Effective durations (milestones as stored, everything else at least 1).
    pub durations: Vec<u32>,
    pub is_milestone: Vec<bool>,
    pub constraints: Vec<Constraint>,
    /// Previously persisted (start, end) dates.
    pub stored: Vec<(Option<NaiveDate>, Option<NaiveDate>)>,
    /// Incoming edges per task.
    pub preds: Vec<Vec<GraphEdge>>,
    /// Outgoing edges per task, one entry per edge (duplicates kept).
    pub dependents: Vec<Vec<TaskIdx>>,
    /// Edges whose predecessor is not part of the run.
    pub dropped_edges: usize,
}

impl ScheduleGraph {
    /// Build the graph from loaded task records.
    ///
    /// A task id seen twice keeps its first record. Edges pointing at tasks
    /// outside `tasks` (archived, or in another project) are dropped.
    pub fn build(tasks: &[TaskRecord], verbosity: u8) -> Self {
        let mut index = TaskIndex::with_capacity(tasks.len());
        let mut records: Vec<&TaskRecord> = Vec::with_capacity(tasks.len());
        for task in tasks {
            if index.get(&task.id).is_some() {
                tracing::warn!(task_id = %task.id, "duplicate task record ignored");
                continue;
            }
            index.intern(&task.id);
            records.push(task);
        }

        let n = records.len();
        let durations: Vec<u32> = records.iter().map(|t| t.effective_duration()).collect();
        let is_milestone: Vec<bool> = records.iter().map(|t| t.is_milestone).collect();
        let constraints: Vec<Constraint> = records
            .iter()
            .map(|t| Constraint::resolve(&t.constraint_type, t.constraint_date))
            .collect();
        let stored = records.iter().map(|t| (t.start_date, t.end_date)).collect();

        let mut preds: Vec<Vec<GraphEdge>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<TaskIdx>> = vec![Vec::new(); n];
        let mut dropped_edges = 0;

        for (idx, task) in records.iter().enumerate() {
            for pred in &task.predecessors {
                let Some(pred_idx) = index.get(&pred.task_id) else {
                    log_checks!(
                        verbosity,
                        task_id = %task.id,
                        pred_id = %pred.task_id,
                        "dropping edge to task outside the run"
                    );
                    dropped_edges += 1;
                    continue;
                };
                let p = pred_idx as usize;
                preds[idx].push(GraphEdge {
                    pred: pred_idx,
                    dep_type: pred.dep_type.clone(),
                    lag_days: pred.lag_days,
                    pred_duration: durations[p],
                    pred_is_milestone: is_milestone[p],
                    pred_constraint: constraints[p],
                });
                dependents[p].push(idx as TaskIdx);
            }
        }

        log_debug!(
            verbosity,
            tasks = n,
            edges = preds.iter().map(Vec::len).sum::<usize>(),
            dropped_edges,
            "built dependency graph"
        );

        Self {
            index,
            durations,
            is_milestone,
            constraints,
            stored,
            preds,
            dependents,
            dropped_edges,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Task id for a dense index handed out by this graph.
    pub fn task_id(&self, idx: TaskIdx) -> &TaskId {
        self.index.id(idx)
    }
}
