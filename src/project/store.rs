//! Task storage collaborator
//!
//! The query path only reads through [`TaskStore`]. [`MemoryTaskStore`] keeps
//! a materialised task list and derives the completion index from it.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::errors::{DataManagerError, DmResult};
use crate::record::Task;

/// Read access to a project's tasks and completion aggregates
pub trait TaskStore {
    /// All task ids in storage order
    fn task_ids(&self) -> DmResult<Vec<i64>>;

    /// A task without completions
    fn get(&self, id: i64) -> DmResult<Option<Task>>;

    /// A task with its completions; `None` when it has no completions
    fn get_with_completions(&self, id: i64) -> DmResult<Option<Task>>;

    /// Latest completion time per task, epoch seconds
    fn completed_at_by_task(&self) -> DmResult<HashMap<i64, i64>>;

    /// Number of cancelled completions per task
    fn cancelled_status_by_task(&self) -> DmResult<HashMap<i64, i64>>;
}

impl<T: TaskStore + ?Sized> TaskStore for Box<T> {
    fn task_ids(&self) -> DmResult<Vec<i64>> {
        (**self).task_ids()
    }

    fn get(&self, id: i64) -> DmResult<Option<Task>> {
        (**self).get(id)
    }

    fn get_with_completions(&self, id: i64) -> DmResult<Option<Task>> {
        (**self).get_with_completions(id)
    }

    fn completed_at_by_task(&self) -> DmResult<HashMap<i64, i64>> {
        (**self).completed_at_by_task()
    }

    fn cancelled_status_by_task(&self) -> DmResult<HashMap<i64, i64>> {
        (**self).cancelled_status_by_task()
    }
}

/// In-memory task store
#[derive(Debug, Clone, Default)]
pub struct MemoryTaskStore {
    tasks: Vec<Task>,
    positions: HashMap<i64, usize>,
}

impl MemoryTaskStore {
    /// Build a store, rejecting duplicate ids
    pub fn from_tasks(tasks: Vec<Task>) -> DmResult<Self> {
        let mut positions = HashMap::with_capacity(tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            if positions.insert(task.id, index).is_some() {
                return Err(DataManagerError::Storage(format!(
                    "duplicate task id {}",
                    task.id
                )));
            }
        }
        Ok(Self { tasks, positions })
    }

    /// Load a JSON array of tasks from a file
    pub fn load_json(path: &Path) -> DmResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            DataManagerError::Storage(format!("cannot read {}: {}", path.display(), e))
        })?;
        let tasks: Vec<Task> = serde_json::from_slice(&bytes).map_err(|e| {
            DataManagerError::Storage(format!("invalid tasks file {}: {}", path.display(), e))
        })?;
        Self::from_tasks(tasks)
    }

    /// Sorted, de-duplicated keys used across all task payloads
    pub fn data_keys(&self) -> Vec<String> {
        self.tasks
            .iter()
            .flat_map(|task| task.data.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn find(&self, id: i64) -> Option<&Task> {
        self.positions.get(&id).map(|&index| &self.tasks[index])
    }

    fn with_completions(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|task| !task.completions.is_empty())
    }
}

impl TaskStore for MemoryTaskStore {
    fn task_ids(&self) -> DmResult<Vec<i64>> {
        Ok(self.tasks.iter().map(|task| task.id).collect())
    }

    fn get(&self, id: i64) -> DmResult<Option<Task>> {
        Ok(self.find(id).map(|task| {
            let mut task = task.clone();
            task.completions.clear();
            task
        }))
    }

    fn get_with_completions(&self, id: i64) -> DmResult<Option<Task>> {
        Ok(self
            .find(id)
            .filter(|task| !task.completions.is_empty())
            .cloned())
    }

    fn completed_at_by_task(&self) -> DmResult<HashMap<i64, i64>> {
        Ok(self
            .with_completions()
            .filter_map(|task| {
                task.completions
                    .iter()
                    .filter_map(|c| c.created_at.as_ref().and_then(|t| t.epoch()))
                    .max()
                    .map(|latest| (task.id, latest))
            })
            .collect())
    }

    fn cancelled_status_by_task(&self) -> DmResult<HashMap<i64, i64>> {
        Ok(self
            .with_completions()
            .map(|task| {
                let cancelled = task.completions.iter().filter(|c| c.was_cancelled()).count();
                (task.id, cancelled as i64)
            })
            .collect())
    }
}
