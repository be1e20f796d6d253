//! Task ordering
//!
//! One column is honored per request. Null values sort after every non-null
//! value in both directions; the direction only flips the non-null order.
//! Sorting is stable, so equal keys keep their input order.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

use super::values::compare_values;
use crate::record::{resolve_field, Task};

/// Column-name prefix marking task-scoped ordering directives
pub const TASKS_PREFIX: &str = "tasks:";

/// Column ordered with a fixed `completed_at` tie-break
pub const CANCELLED_COLUMN: &str = "has_cancelled_completions";

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Applies this direction to an ordering
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Null-last, direction-aware sort key
#[derive(Debug, Clone)]
pub struct OrderKey {
    value: Value,
    direction: SortDirection,
}

impl OrderKey {
    pub fn new(value: Value, direction: SortDirection) -> Self {
        Self { value, direction }
    }

    pub fn asc(value: Value) -> Self {
        Self::new(value, SortDirection::Asc)
    }

    pub fn desc(value: Value) -> Self {
        Self::new(value, SortDirection::Desc)
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_null(), other.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self
                .direction
                .apply(compare_values(&self.value, &other.value)),
        }
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Field path to sort by
    pub field: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Picks the first task-scoped directive; ascending `id` when none.
    ///
    /// `["-tasks:completed_at", "tasks:id"]` orders by `completed_at`, descending.
    pub fn from_ordering<S: AsRef<str>>(ordering: &[S]) -> Self {
        ordering
            .iter()
            .map(AsRef::as_ref)
            .find_map(Self::parse_directive)
            .unwrap_or_else(|| Self::asc("id"))
    }

    /// Parses `tasks:<field>` / `-tasks:<field>`; other namespaces yield `None`
    fn parse_directive(directive: &str) -> Option<Self> {
        match directive.strip_prefix('-') {
            Some(rest) => rest.strip_prefix(TASKS_PREFIX).map(Self::desc),
            None => directive.strip_prefix(TASKS_PREFIX).map(Self::asc),
        }
    }

    /// Sort keys for one task, primary first
    fn keys(&self, task: &Task) -> Vec<OrderKey> {
        if self.field == CANCELLED_COLUMN {
            vec![
                OrderKey::new(task.attribute(CANCELLED_COLUMN), self.direction),
                OrderKey::asc(task.attribute("completed_at")),
            ]
        } else {
            vec![OrderKey::new(
                resolve_field(task, &self.field),
                self.direction,
            )]
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction.as_str())
    }
}

/// Sorts tasks
pub struct ResultSorter;

impl ResultSorter {
    /// Sorts tasks according to the sort specification.
    ///
    /// Keys are resolved once per task, then the tasks are stably sorted.
    pub fn sort(tasks: Vec<Task>, sort_spec: &SortSpec) -> Vec<Task> {
        let mut keyed: Vec<(Vec<OrderKey>, Task)> = tasks
            .into_iter()
            .map(|task| (sort_spec.keys(&task), task))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
        keyed.into_iter().map(|(_, task)| task).collect()
    }
}
