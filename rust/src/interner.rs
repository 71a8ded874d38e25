//! Dense integer indexing of task ids.
//!
//! Every task loaded for a run gets a `TaskIdx` in load order, so the graph and
//! the forward pass can keep per-task state in plain vectors.

use rustc_hash::FxHashMap;

use crate::models::TaskId;

/// Dense task index (u32 for compact adjacency lists).
pub type TaskIdx = u32;

/// Bidirectional mapping between task ids and dense indices.
#[derive(Debug, Clone)]
pub struct TaskIndex {
    to_idx: FxHashMap<TaskId, TaskIdx>,
    from_idx: Vec<TaskId>,
}

impl TaskIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_idx: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            from_idx: Vec::with_capacity(capacity),
        }
    }

    /// Assign the next index to `id`, or return the one it already has.
    pub fn intern(&mut self, id: &TaskId) -> TaskIdx {
        if let Some(&idx) = self.to_idx.get(id) {
            return idx;
        }
        let idx = self.from_idx.len() as TaskIdx;
        self.from_idx.push(id.clone());
        self.to_idx.insert(id.clone(), idx);
        idx
    }

    #[inline]
    pub fn get(&self, id: &TaskId) -> Option<TaskIdx> {
        self.to_idx.get(id).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: TaskIdx) -> Option<&TaskId> {
        self.from_idx.get(idx as usize)
    }

    /// Task id for an index this interner issued.
    ///
    /// # Panics
    /// If `idx` was not issued by this interner.
    #[inline]
    pub fn id(&self, idx: TaskIdx) -> &TaskId {
        &self.from_idx[idx as usize]
    }

    pub fn len(&self) -> usize {
        self.from_idx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_idx.is_empty()
    }
}

impl Default for TaskIndex {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}
