//! Result types for query execution

use serde::{Deserialize, Serialize};

use crate::record::{Completion, Task};

/// A page of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPage {
    /// Tasks on this page, in result order
    pub tasks: Vec<Task>,
    /// Number of tasks after filtering, before pagination
    pub total: usize,
}

impl TaskPage {
    /// Returns the ids on this page
    pub fn ids(&self) -> Vec<i64> {
        self.tasks.iter().map(|task| task.id).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}

/// A page of flattened completions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationPage {
    pub annotations: Vec<Completion>,
    /// Number of completions before pagination
    pub total: usize,
}

impl AnnotationPage {
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }
}
