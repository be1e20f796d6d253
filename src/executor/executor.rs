//! Query orchestration for tasks and annotations
//!
//! Task execution flow (strict order):
//! 1. Compile the tab's filters (malformed clauses fail before any loading)
//! 2. Collect the field paths referenced by filters and ordering
//! 3. Preload tasks with completion aggregates; resolve URIs only when a
//!    referenced path lives under `data.`
//! 4. Filter, then sort; `total` is the filtered count
//! 5. Paginate
//! 6. Resolve URIs on every task of the page
//!
//! URI resolution can hit remote storage for every task, so step 3 must not
//! resolve anything unless filtering or ordering reads the payload.

use std::collections::BTreeSet;

use crate::errors::DmResult;
use crate::project::{Project, TaskStore, UriResolver};
use crate::record::{format_local, is_data_field, CompletionTime, Task};
use crate::tabs::Tab;

use super::filters::{FilterKey, FilterPlan};
use super::pagination::paginate;
use super::result::{AnnotationPage, TaskPage};
use super::sorter::{ResultSorter, SortSpec};

/// A tab plus the page being requested
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub tab: Option<Tab>,
    pub page: i64,
    pub page_size: i64,
}

impl QueryParams {
    /// Params taking pagination from the tab, unpaginated when it has none
    pub fn new(tab: Option<Tab>) -> Self {
        let page = tab.as_ref().and_then(|t| t.page).unwrap_or(0);
        let page_size = tab.as_ref().and_then(|t| t.page_size).unwrap_or(0);
        Self {
            tab,
            page,
            page_size,
        }
    }

    pub fn with_page(mut self, page: i64, page_size: i64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Replaces whichever pagination values are given
    pub fn with_overrides(mut self, page: Option<i64>, page_size: Option<i64>) -> Self {
        if let Some(page) = page {
            self.page = page;
        }
        if let Some(page_size) = page_size {
            self.page_size = page_size;
        }
        self
    }

    /// Same tab with pagination switched off
    pub fn unpaginated(&self) -> Self {
        Self::new(self.tab.clone()).with_page(0, 0)
    }

    /// The ordering this request uses
    pub fn sort_spec(&self) -> SortSpec {
        match &self.tab {
            Some(tab) => SortSpec::from_ordering(tab.ordering_directives()),
            None => SortSpec::asc("id"),
        }
    }
}

/// Field paths referenced by a tab's filters and its active ordering
pub fn used_fields(params: &QueryParams) -> BTreeSet<String> {
    let mut fields: BTreeSet<String> = params
        .tab
        .iter()
        .flat_map(|tab| tab.filter_clauses())
        .map(|clause| match clause.filter.parse::<FilterKey>() {
            Ok(key) => key.field,
            Err(_) => clause.filter.clone(),
        })
        .collect();
    fields.insert(params.sort_spec().field);
    fields
}

/// Whether any referenced field reads the task payload
pub fn needs_uri_resolution(fields: &BTreeSet<String>) -> bool {
    fields.iter().any(|field| is_data_field(field))
}

/// Loads every task with its completion aggregates
fn preload_tasks<S: TaskStore, R: UriResolver>(
    project: &Project<S, R>,
    resolve_uri: bool,
) -> DmResult<Vec<Task>> {
    let store = project.store();
    let task_ids = store.task_ids()?;
    let all_completed_at = store.completed_at_by_task()?;
    let all_cancelled = store.cancelled_status_by_task()?;

    let mut tasks = Vec::with_capacity(task_ids.len());
    for id in task_ids {
        let task = match store.get_with_completions(id)? {
            Some(mut task) => {
                if let Some(&completed_at) = all_completed_at.get(&id) {
                    task.completed_at = match completed_at {
                        0 => None,
                        secs => format_local(secs, project.datetime_format()),
                    };
                }
                if let Some(&cancelled) = all_cancelled.get(&id) {
                    task.has_cancelled_completions = Some(cancelled);
                }
                task.total_completions = Some(task.completions.len() as u64);
                task
            }
            None => match store.get(id)? {
                Some(task) => task,
                None => {
                    tracing::warn!(event = "TASK_MISSING", task_id = id, "listed task not found");
                    continue;
                }
            },
        };

        let task = if resolve_uri {
            project.resolver().resolve(task)?
        } else {
            task
        };
        tasks.push(task);
    }

    Ok(tasks)
}

/// Filters, orders and paginates a project's tasks for a tab
pub fn prepare_tasks<S: TaskStore, R: UriResolver>(
    project: &Project<S, R>,
    params: &QueryParams,
) -> DmResult<TaskPage> {
    let plan = FilterPlan::from_tab(params.tab.as_ref())?;
    let sort_spec = params.sort_spec();
    let fields = used_fields(params);
    let resolve_uri = needs_uri_resolution(&fields);

    tracing::debug!(
        event = "TASKS_QUERY_START",
        sort = %sort_spec,
        filters = plan.as_ref().map_or(0, |p| p.filters.len()),
        resolve_uri,
        "preparing tasks"
    );

    let tasks = preload_tasks(project, resolve_uri)?;
    let tasks = match &plan {
        Some(plan) => plan.apply(tasks),
        None => tasks,
    };
    let tasks = ResultSorter::sort(tasks, &sort_spec);
    let total = tasks.len();

    let tasks = paginate(tasks, params.page, params.page_size)
        .into_iter()
        .map(|task| project.resolver().resolve(task))
        .collect::<DmResult<Vec<_>>>()?;

    tracing::info!(
        event = "TASKS_PREPARED",
        total,
        returned = tasks.len(),
        page = params.page,
        page_size = params.page_size,
        "tasks prepared"
    );

    Ok(TaskPage { tasks, total })
}

/// Flattens completions out of a task list and paginates them.
///
/// Each completion is stamped with its task id; epoch creation times become
/// formatted local timestamps. Null or zero times are left as they are.
pub fn prepare_annotations(
    tasks: &[Task],
    params: &QueryParams,
    datetime_format: &str,
) -> AnnotationPage {
    let mut items = Vec::new();
    for task in tasks {
        for completion in &task.completions {
            let mut completion = completion.clone();
            completion.task_id = Some(task.id);

            if let Some(secs) = completion.created_at.as_ref().and_then(CompletionTime::epoch) {
                if secs != 0 {
                    if let Some(formatted) = format_local(secs, datetime_format) {
                        completion.created_at = Some(CompletionTime::Formatted(formatted));
                    }
                }
            }
            items.push(completion);
        }
    }

    let total = items.len();
    let annotations = paginate(items, params.page, params.page_size);

    tracing::info!(
        event = "ANNOTATIONS_PREPARED",
        total,
        returned = annotations.len(),
        "annotations prepared"
    );

    AnnotationPage { annotations, total }
}
