//! Tab filtering for task collections
//!
//! Clauses are compiled up front so that a malformed clause fails the request
//! before any task is examined.
//!
//! - `and`: each clause narrows the current result in turn.
//! - `or`: each clause appends every input task it matches. A task matching
//!   several clauses appears once per matching clause.

use std::fmt;
use std::str::FromStr;

use crate::errors::{DataManagerError, DmResult};
use crate::record::{resolve_field, Task};
use crate::tabs::{FilterClause, Tab};

use super::operators::{Operator, Predicate};

/// The only filter target currently supported
pub const TASKS_TARGET: &str = "tasks";

/// Boolean combinator across a tab's clauses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conjunction {
    #[default]
    And,
    Or,
}

impl Conjunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Conjunction::And => "and",
            Conjunction::Or => "or",
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Conjunction {
    type Err = DataManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" => Ok(Conjunction::And),
            "or" => Ok(Conjunction::Or),
            other => Err(DataManagerError::UnsupportedConjunction(other.to_string())),
        }
    }
}

/// Parsed `<namespace>:<target>:<field>` filter key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    pub namespace: String,
    pub target: String,
    pub field: String,
}

impl FromStr for FilterKey {
    type Err = DataManagerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(namespace), Some(target), Some(field)) => Ok(Self {
                namespace: namespace.to_string(),
                target: target.to_string(),
                field: field.to_string(),
            }),
            _ => Err(DataManagerError::InvalidFilterKey(s.to_string())),
        }
    }
}

/// A filter clause ready for evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFilter {
    pub field: String,
    pub predicate: Predicate,
}

impl CompiledFilter {
    /// Validates and compiles a stored clause
    pub fn compile(clause: &FilterClause) -> DmResult<Self> {
        let key: FilterKey = clause.filter.parse()?;
        if key.target != TASKS_TARGET {
            return Err(DataManagerError::UnsupportedFilterTarget(key.target));
        }

        let op: Operator = clause.operator.parse()?;
        Ok(Self {
            field: key.field,
            predicate: Predicate::compile(op, &clause.value)?,
        })
    }

    /// Checks if a task matches this filter
    pub fn matches(&self, task: &Task) -> bool {
        self.predicate.matches(&resolve_field(task, &self.field))
    }
}

/// A tab's filter set, compiled
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    pub conjunction: Conjunction,
    pub filters: Vec<CompiledFilter>,
}

impl FilterPlan {
    /// Compiles a tab's filters; `None` when there is nothing to filter.
    ///
    /// A missing conjunction defaults to `and`.
    pub fn from_tab(tab: Option<&Tab>) -> DmResult<Option<Self>> {
        let Some(tab) = tab else {
            return Ok(None);
        };
        let clauses = tab.filter_clauses();
        if clauses.is_empty() {
            return Ok(None);
        }

        let filters = clauses
            .iter()
            .map(CompiledFilter::compile)
            .collect::<DmResult<Vec<_>>>()?;
        let conjunction = match tab.conjunction.as_deref() {
            Some(raw) => raw.parse()?,
            None => Conjunction::default(),
        };

        Ok(Some(Self {
            conjunction,
            filters,
        }))
    }

    /// Applies the plan to a task collection
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        match self.conjunction {
            Conjunction::And => {
                let mut current = tasks;
                for filter in &self.filters {
                    current.retain(|task| filter.matches(task));
                }
                current
            }
            Conjunction::Or => {
                let mut matched = Vec::new();
                for filter in &self.filters {
                    matched.extend(tasks.iter().filter(|task| filter.matches(task)).cloned());
                }
                matched
            }
        }
    }
}

/// Filters tasks by a tab's configuration
pub struct TaskFilter;

impl TaskFilter {
    /// Returns the input unchanged when the tab has no filters
    pub fn apply(tasks: Vec<Task>, tab: Option<&Tab>) -> DmResult<Vec<Task>> {
        match FilterPlan::from_tab(tab)? {
            Some(plan) => Ok(plan.apply(tasks)),
            None => Ok(tasks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new(1).with_data("x", json!("a")).with_data("n", json!(1)),
            Task::new(2).with_data("x", json!("b")).with_data("n", json!(2)),
            Task::new(3).with_data("x", json!("a")).with_data("n", json!(3)),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_no_tab_or_filters_is_identity() {
        assert_eq!(ids(&TaskFilter::apply(tasks(), None).unwrap()), vec![1, 2, 3]);
        let tab = Tab::new(1).with_conjunction("xor");
        assert_eq!(ids(&TaskFilter::apply(tasks(), Some(&tab)).unwrap()), vec![1, 2, 3]);
    }

    #[test]
    fn test_and_equal_keeps_order() {
        let tab = Tab::new(1)
            .with_conjunction("and")
            .with_filter(FilterClause::new("x:tasks:data.x", "equal", json!("a")));
        assert_eq!(ids(&TaskFilter::apply(tasks(), Some(&tab)).unwrap()), vec![1, 3]);
    }

    #[test]
    fn test_and_narrows() {
        let tab = Tab::new(1)
            .with_conjunction("and")
            .with_filter(FilterClause::new("f:tasks:data.x", "equal", json!("a")))
            .with_filter(FilterClause::new("f:tasks:data.n", "greater", json!(1)));
        assert_eq!(ids(&TaskFilter::apply(tasks(), Some(&tab)).unwrap()), vec![3]);
    }

    #[test]
    fn test_or_keeps_duplicates() {
        let tab = Tab::new(1)
            .with_conjunction("or")
            .with_filter(FilterClause::new("f:tasks:data.x", "equal", json!("a")))
            .with_filter(FilterClause::new("f:tasks:id", "less", json!(2)));
        assert_eq!(
            ids(&TaskFilter::apply(tasks(), Some(&tab)).unwrap()),
            vec![1, 3, 1]
        );
    }

    #[test]
    fn test_missing_conjunction_defaults_to_and() {
        let tab = Tab::new(1).with_filter(FilterClause::new("f:tasks:id", "equal", json!(2)));
        assert_eq!(ids(&TaskFilter::apply(tasks(), Some(&tab)).unwrap()), vec![2]);
    }

    #[test]
    fn test_unsupported_target() {
        let tab = Tab::new(1)
            .with_conjunction("and")
            .with_filter(FilterClause::new("f:annotations:id", "equal", json!(1)));
        assert_eq!(
            TaskFilter::apply(tasks(), Some(&tab)),
            Err(DataManagerError::UnsupportedFilterTarget("annotations".to_string()))
        );
    }

    #[test]
    fn test_unsupported_conjunction() {
        let tab = Tab::new(1)
            .with_conjunction("xor")
            .with_filter(FilterClause::new("f:tasks:id", "equal", json!(1)));
        assert_eq!(
            TaskFilter::apply(tasks(), Some(&tab)),
            Err(DataManagerError::UnsupportedConjunction("xor".to_string()))
        );
    }

    #[test]
    fn test_unknown_operator_fails_request() {
        let tab = Tab::new(1)
            .with_conjunction("or")
            .with_filter(FilterClause::new("f:tasks:id", "equal", json!(1)))
            .with_filter(FilterClause::new("f:tasks:id", "regex", json!("1")));
        assert_eq!(
            TaskFilter::apply(tasks(), Some(&tab)),
            Err(DataManagerError::UnknownOperator("regex".to_string()))
        );
    }

    #[test]
    fn test_filter_key_parsing() {
        let key: FilterKey = "filter:tasks:data.a:b".parse().unwrap();
        assert_eq!(key.namespace, "filter");
        assert_eq!(key.target, "tasks");
        assert_eq!(key.field, "data.a:b");

        assert_eq!(
            "tasks:id".parse::<FilterKey>(),
            Err(DataManagerError::InvalidFilterKey("tasks:id".to_string()))
        );
    }

    #[test]
    fn test_colon_in_payload_key() {
        let tasks = vec![
            Task::new(1).with_data("a:b", json!("x")),
            Task::new(2).with_data("a", json!("x")),
        ];
        let tab = Tab::new(1).with_filter(FilterClause::new("filter:tasks:data.a:b", "equal", json!("x")));
        assert_eq!(ids(&TaskFilter::apply(tasks, Some(&tab)).unwrap()), vec![1]);
    }
}
