//! Query Invariant Tests
//!
//! Tests for the task query pipeline:
//! - Field resolution against payload and top-level attributes
//! - Null-last, stable ordering
//! - AND narrowing and OR union with duplicates
//! - Pagination reconstructs the full ordered set
//! - Annotation flattening

use datamanager::executor::{
    evaluate, paginate, prepare_annotations, prepare_tasks, Operator, QueryParams, ResultSorter,
    SortSpec, TaskFilter,
};
use datamanager::project::{MemoryTaskStore, PassthroughResolver, Project};
use datamanager::record::{resolve_field, Completion, CompletionTime, Task, DEFAULT_DATETIME_FORMAT};
use datamanager::tabs::{FilterClause, Tab};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn ids(tasks: &[Task]) -> Vec<i64> {
    tasks.iter().map(|t| t.id).collect()
}

fn xs() -> Vec<Task> {
    vec![
        Task::new(1).with_data("x", json!("a")),
        Task::new(2).with_data("x", json!("b")),
        Task::new(3).with_data("x", json!("a")),
    ]
}

fn scored() -> Vec<Task> {
    vec![
        Task::new(1).with_data("score", json!(5)),
        Task::new(2),
        Task::new(3).with_data("score", json!(1)),
        Task::new(4).with_data("score", Value::Null),
        Task::new(5).with_data("score", json!(3)),
        Task::new(6).with_data("score", json!(3)),
    ]
}

fn project(tasks: Vec<Task>) -> Project<MemoryTaskStore, PassthroughResolver> {
    Project::from_memory(MemoryTaskStore::from_tasks(tasks).unwrap(), PassthroughResolver)
}

fn clause(field: &str, operator: &str, value: Value) -> FilterClause {
    FilterClause::new(format!("filter:tasks:{}", field), operator, value)
}

// =============================================================================
// Field Resolution Tests
// =============================================================================

/// Payload paths read `data`; other paths read attributes; absence is null.
#[test]
fn test_resolve_field() {
    let task = Task::new(9).with_data("x", json!([1, 2]));

    assert_eq!(resolve_field(&task, "data.x"), json!([1, 2]));
    assert_eq!(resolve_field(&task, "data.missing"), Value::Null);
    assert_eq!(resolve_field(&task, "id"), json!(9));
    assert_eq!(resolve_field(&task, "no_such_attribute"), Value::Null);
}

// =============================================================================
// Ordering Tests
// =============================================================================

/// Descending id order.
#[test]
fn test_descending_id() {
    let tasks = vec![Task::new(3), Task::new(1), Task::new(2)];
    let sorted = ResultSorter::sort(tasks, &SortSpec::from_ordering(&["-tasks:id"]));
    assert_eq!(ids(&sorted), vec![3, 2, 1]);
}

/// Null keys come last in both directions.
#[test]
fn test_nulls_last_both_directions() {
    let asc = ResultSorter::sort(scored(), &SortSpec::asc("data.score"));
    assert_eq!(ids(&asc), vec![3, 5, 6, 1, 2, 4]);

    let desc = ResultSorter::sort(scored(), &SortSpec::desc("data.score"));
    assert_eq!(ids(&desc), vec![1, 5, 6, 3, 2, 4]);
}

/// Equal keys keep input order.
#[test]
fn test_sort_is_stable() {
    let tasks = vec![
        Task::new(10).with_data("k", json!(1)),
        Task::new(4).with_data("k", json!(1)),
        Task::new(7).with_data("k", json!(0)),
        Task::new(2).with_data("k", json!(1)),
    ];
    let sorted = ResultSorter::sort(tasks, &SortSpec::asc("data.k"));
    assert_eq!(ids(&sorted), vec![7, 10, 4, 2]);
}

/// Cancelled-count ordering breaks ties on completion time, ascending.
#[test]
fn test_cancelled_ordering_tie_break() {
    let project = project(vec![
        Task::new(1)
            .with_completion(Completion::new(1, Some(3_000)).with_field("was_cancelled", json!(true))),
        Task::new(2)
            .with_completion(Completion::new(2, Some(1_000)).with_field("was_cancelled", json!(true))),
        Task::new(3).with_completion(Completion::new(3, Some(2_000))),
        Task::new(4),
    ]);
    let tab = Tab::new(1).with_ordering(["-tasks:has_cancelled_completions"]);

    let page = prepare_tasks(&project, &QueryParams::new(Some(tab))).unwrap();
    assert_eq!(ids(&page.tasks), vec![2, 1, 3, 4]);
}

/// Only the first task-scoped directive applies.
#[test]
fn test_first_tasks_directive_wins() {
    let spec = SortSpec::from_ordering(&["annotations:id", "-tasks:data.score", "tasks:id"]);
    assert_eq!(spec, SortSpec::desc("data.score"));
    assert_eq!(SortSpec::from_ordering::<&str>(&[]), SortSpec::asc("id"));
}

// =============================================================================
// Filter Tests
// =============================================================================

/// Equal filter keeps matching tasks in input order.
#[test]
fn test_equal_filter_example() {
    let tab = Tab::new(1)
        .with_filter(FilterClause::new("x:tasks:data.x", "equal", json!("a")))
        .with_conjunction("and");

    let filtered = TaskFilter::apply(xs(), Some(&tab)).unwrap();
    assert_eq!(ids(&filtered), vec![1, 3]);
}

/// Each AND clause can only shrink the result.
#[test]
fn test_and_narrowing() {
    let clauses = [
        clause("data.score", "not_empty", json!(false)),
        clause("data.score", "greater", json!(1)),
        clause("data.score", "less", json!(5)),
        clause("id", "equal", json!(6)),
    ];

    let mut tab = Tab::new(1).with_conjunction("and");
    let mut previous = TaskFilter::apply(scored(), Some(&tab)).unwrap();
    assert_eq!(previous.len(), 6);

    for c in clauses {
        tab = tab.with_filter(c);
        let current = TaskFilter::apply(scored(), Some(&tab)).unwrap();
        assert!(current.len() <= previous.len());
        assert!(current.iter().all(|t| previous.contains(t)));
        previous = current;
    }
    assert_eq!(ids(&previous), vec![6]);
}

/// A task matching two OR clauses appears twice.
#[test]
fn test_or_preserves_duplicates() {
    let tab = Tab::new(1)
        .with_filter(clause("data.x", "equal", json!("a")))
        .with_filter(clause("id", "less", json!(2)))
        .with_conjunction("or");

    let filtered = TaskFilter::apply(xs(), Some(&tab)).unwrap();
    assert_eq!(ids(&filtered), vec![1, 3, 1]);
}

/// Non-task targets and unknown conjunctions fail the whole request.
#[test]
fn test_rejected_tabs() {
    let tab = Tab::new(1).with_filter(FilterClause::new(
        "filter:annotations:id",
        "equal",
        json!(1),
    ));
    let err = prepare_tasks(&project(xs()), &QueryParams::new(Some(tab))).unwrap_err();
    assert_eq!(err.code(), "DM_UNSUPPORTED_FILTER_TARGET");

    let tab = Tab::new(1)
        .with_filter(clause("id", "equal", json!(1)))
        .with_conjunction("xor");
    let err = prepare_tasks(&project(xs()), &QueryParams::new(Some(tab))).unwrap_err();
    assert_eq!(err.code(), "DM_UNSUPPORTED_CONJUNCTION");

    let tab = Tab::new(1).with_filter(clause("id", "near", json!(1)));
    let err = prepare_tasks(&project(xs()), &QueryParams::new(Some(tab))).unwrap_err();
    assert_eq!(err.code(), "DM_UNKNOWN_OPERATOR");
}

/// `empty` gates on the configured flag.
#[test]
fn test_empty_operator_examples() {
    assert!(evaluate(Operator::Empty, &json!(true), &json!("")).unwrap());
    assert!(!evaluate(Operator::Empty, &json!(true), &json!("x")).unwrap());
    for field in [json!(""), json!("x"), Value::Null, json!([])] {
        assert!(!evaluate(Operator::Empty, &json!(false), &field).unwrap());
    }
}

/// Range membership and its negation.
#[test]
fn test_in_range() {
    let range = json!({"min": 2, "max": 4});
    assert!(evaluate(Operator::In, &range, &json!(2)).unwrap());
    assert!(evaluate(Operator::In, &range, &json!(4)).unwrap());
    assert!(!evaluate(Operator::In, &range, &json!(5)).unwrap());
    assert!(evaluate(Operator::NotIn, &range, &json!(5)).unwrap());
}

// =============================================================================
// Pagination Tests
// =============================================================================

/// Concatenating every page rebuilds the ordered, filtered set exactly once.
#[test]
fn test_pagination_round_trip() {
    let tasks: Vec<Task> = (1..=23)
        .map(|id| Task::new(id).with_data("n", json!(id % 7)))
        .collect();
    let project = project(tasks);
    let tab = Tab::new(1)
        .with_filter(clause("data.n", "not_equal", json!(0)))
        .with_ordering(["-tasks:data.n"]);

    let full = prepare_tasks(&project, &QueryParams::new(Some(tab.clone()))).unwrap();
    let page_size = 4;
    let pages = (full.total as i64 + page_size - 1) / page_size;

    let mut rebuilt = Vec::new();
    for page in 1..=pages {
        let params = QueryParams::new(Some(tab.clone())).with_page(page, page_size);
        let result = prepare_tasks(&project, &params).unwrap();
        assert_eq!(result.total, full.total);
        rebuilt.extend(result.tasks);
    }

    assert_eq!(ids(&rebuilt), ids(&full.tasks));
}

/// Non-positive page or size returns everything.
#[test]
fn test_unpaginated_when_not_positive() {
    let items: Vec<i64> = (1..=5).collect();
    assert_eq!(paginate(items.clone(), 0, 2), items);
    assert_eq!(paginate(items.clone(), 2, 0), items);
    assert_eq!(paginate(items.clone(), -1, -1), items);
    assert_eq!(paginate(items, 3, 2), vec![5]);
}

// =============================================================================
// Annotation Tests
// =============================================================================

/// Completions are stamped with their task and timestamps formatted.
#[test]
fn test_annotation_flattening() {
    let tasks = vec![Task::new(5)
        .with_completion(Completion::new(1, Some(1_000)))
        .with_completion(Completion::new(2, None))];

    let page = prepare_annotations(&tasks, &QueryParams::default(), DEFAULT_DATETIME_FORMAT);

    assert_eq!(page.total, 2);
    assert!(page.annotations.iter().all(|a| a.task_id == Some(5)));
    assert!(matches!(
        page.annotations[0].created_at,
        Some(CompletionTime::Formatted(_))
    ));
    assert_eq!(page.annotations[1].created_at, None);

    let value = serde_json::to_value(&page.annotations[1]).unwrap();
    assert_eq!(value["created_at"], Value::Null);
}
