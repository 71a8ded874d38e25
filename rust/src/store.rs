//! Task store interface and an in-memory implementation.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

use crate::error::StoreError;
use crate::models::{DateUpdate, ProjectId, TaskId, TaskRecord};

/// Source of task graphs and sink for computed dates.
///
/// Implementations are expected to make each date write independent: a
/// failed write must not roll back earlier ones.
pub trait TaskStore {
    /// Every non-archived task of the project, with its predecessor edges.
    fn list_tasks_with_predecessors(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<TaskRecord>, StoreError>;

    /// Persist computed dates for one task.
    fn update_task_dates(
        &self,
        task_id: &TaskId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), StoreError>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn list_tasks_with_predecessors(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<TaskRecord>, StoreError> {
        (**self).list_tasks_with_predecessors(project_id)
    }

    fn update_task_dates(
        &self,
        task_id: &TaskId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), StoreError> {
        (**self).update_task_dates(task_id, start_date, end_date)
    }
}

impl<S: TaskStore + ?Sized> TaskStore for Arc<S> {
    fn list_tasks_with_predecessors(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<TaskRecord>, StoreError> {
        (**self).list_tasks_with_predecessors(project_id)
    }

    fn update_task_dates(
        &self,
        task_id: &TaskId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), StoreError> {
        (**self).update_task_dates(task_id, start_date, end_date)
    }
}

#[derive(Clone, Debug)]
struct StoredTask {
    project_id: ProjectId,
    record: TaskRecord,
    archived: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    projects: Vec<ProjectId>,
    /// Tasks in insertion order.
    tasks: Vec<StoredTask>,
    positions: FxHashMap<TaskId, usize>,
    writes: Vec<DateUpdate>,
}

/// Thread-safe in-memory task store.
///
/// Keeps a log of every date write so callers can observe exactly which tasks
/// a run touched.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    state: RwLock<MemoryState>,
}

fn poisoned() -> StoreError {
    StoreError::Backend("task store lock poisoned".to_string())
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project so it can be listed even while it has no tasks.
    pub fn add_project(&self, project_id: ProjectId) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if !state.projects.contains(&project_id) {
            state.projects.push(project_id);
        }
        Ok(())
    }

    /// Insert or replace a task, registering its project if needed.
    pub fn upsert_task(
        &self,
        project_id: &ProjectId,
        record: TaskRecord,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        if !state.projects.contains(project_id) {
            state.projects.push(project_id.clone());
        }
        let stored = StoredTask {
            project_id: project_id.clone(),
            record,
            archived: false,
        };
        let existing = state.positions.get(&stored.record.id).copied();
        match existing {
            Some(pos) => state.tasks[pos] = stored,
            None => {
                let pos = state.tasks.len();
                state.positions.insert(stored.record.id.clone(), pos);
                state.tasks.push(stored);
            }
        }
        Ok(())
    }

    /// Mark a task archived; archived tasks are no longer listed.
    pub fn archive_task(&self, task_id: &TaskId) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let pos = state
            .positions
            .get(task_id)
            .copied()
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;
        state.tasks[pos].archived = true;
        Ok(())
    }

    /// Current stored record for a task, archived or not.
    pub fn task(&self, task_id: &TaskId) -> Result<Option<TaskRecord>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state
            .positions
            .get(task_id)
            .map(|&pos| state.tasks[pos].record.clone()))
    }

    /// Every date write received so far, in order.
    pub fn writes(&self) -> Result<Vec<DateUpdate>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.writes.clone())
    }

    pub fn clear_writes(&self) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.writes.clear();
        Ok(())
    }
}

impl TaskStore for MemoryTaskStore {
    fn list_tasks_with_predecessors(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<TaskRecord>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        if !state.projects.contains(project_id) {
            return Err(StoreError::ProjectNotFound(project_id.clone()));
        }
        Ok(state
            .tasks
            .iter()
            .filter(|t| !t.archived && &t.project_id == project_id)
            .map(|t| t.record.clone())
            .collect())
    }

    fn update_task_dates(
        &self,
        task_id: &TaskId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let pos = state
            .positions
            .get(task_id)
            .copied()
            .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;
        let record = &mut state.tasks[pos].record;
        record.start_date = Some(start_date);
        record.end_date = Some(end_date);
        state.writes.push(DateUpdate {
            task_id: task_id.clone(),
            start_date,
            end_date,
        });
        Ok(())
    }
}
