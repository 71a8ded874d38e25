//! Recalculation driver: load, compute, write back.

use chrono::{Local, NaiveDate};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::log_changes;
use crate::models::{ProjectId, RecalcSummary};
use crate::schedule::compute_schedule;
use crate::store::TaskStore;

/// Recomputes and persists the earliest schedule of a project.
///
/// Holds no state between runs and no locks during one; concurrent runs for
/// the same project resolve last-writer-wins per task.
#[derive(Debug)]
pub struct ScheduleEngine<S> {
    store: S,
    config: EngineConfig,
}

impl<S: TaskStore> ScheduleEngine<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recalculate using today's local date as the anchor for root tasks.
    pub fn recalculate_today(&self, project_id: &ProjectId) -> Result<RecalcSummary, EngineError> {
        self.recalculate(project_id, Local::now().date_naive())
    }

    /// Recalculate a project's schedule and write back changed dates.
    ///
    /// Writes happen one task at a time in topological order. If one fails the
    /// run stops: earlier writes stay in place and the error reports how many
    /// landed. Re-running is safe.
    pub fn recalculate(
        &self,
        project_id: &ProjectId,
        reference_date: NaiveDate,
    ) -> Result<RecalcSummary, EngineError> {
        let verbosity = self.config.verbosity;
        let tasks = self.store.list_tasks_with_predecessors(project_id)?;
        if tasks.is_empty() {
            log_changes!(verbosity, project_id = %project_id, "no tasks to schedule");
            return Ok(RecalcSummary::default());
        }

        let computed = compute_schedule(&tasks, reference_date, &self.config)?;

        let mut written = 0;
        if !self.config.dry_run {
            for update in &computed.updates {
                self.store
                    .update_task_dates(&update.task_id, update.start_date, update.end_date)
                    .map_err(|source| EngineError::Write {
                        task_id: update.task_id.clone(),
                        written,
                        source,
                    })?;
                written += 1;
            }
        }

        let summary = RecalcSummary {
            updated_count: if self.config.dry_run {
                computed.updates.len()
            } else {
                written
            },
            ordered_count: computed.ordered_count(),
            total_count: computed.total_count,
            skipped_task_ids: computed.skipped,
        };

        log_changes!(
            verbosity,
            project_id = %project_id,
            updated = summary.updated_count,
            ordered = summary.ordered_count,
            total = summary.total_count,
            dry_run = self.config.dry_run,
            "schedule recalculated"
        );

        Ok(summary)
    }
}
