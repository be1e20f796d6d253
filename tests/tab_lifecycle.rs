//! Tab Lifecycle Tests
//!
//! Tests for session-scoped tab CRUD feeding the query pipeline:
//! - Saved tabs drive filtering, ordering and pagination
//! - Deleted tabs fall back to bare tabs unless existence is required
//! - Sessions never see each other's tabs

use datamanager::errors::DataManagerError;
use datamanager::executor::{prepare_tasks, QueryParams};
use datamanager::project::{MemoryTaskStore, PassthroughResolver, Project};
use datamanager::record::Task;
use datamanager::tabs::{FilterClause, SessionTabStore, Tab, TabSessions, TabStore};
use serde_json::json;
use uuid::Uuid;

// =============================================================================
// Helper Functions
// =============================================================================

fn project() -> Project<MemoryTaskStore, PassthroughResolver> {
    let tasks = (1..=6)
        .map(|id| {
            Task::new(id)
                .with_data("label", json!(if id % 2 == 0 { "dog" } else { "cat" }))
                .with_data("size", json!(id * 10))
        })
        .collect();
    Project::from_memory(MemoryTaskStore::from_tasks(tasks).unwrap(), PassthroughResolver)
}

fn ids(store: &SessionTabStore, tab_id: i64) -> Vec<i64> {
    let tab = store.load(tab_id, false).unwrap();
    prepare_tasks(&project(), &QueryParams::new(Some(tab)))
        .unwrap()
        .ids()
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

/// A saved tab drives the next query.
#[test]
fn test_saved_tab_drives_query() {
    let mut store = SessionTabStore::new();
    assert_eq!(ids(&store, 1), vec![1, 2, 3, 4, 5, 6]);

    store.save(
        1,
        Tab::new(1)
            .with_filter(FilterClause::new("filter:tasks:data.label", "equal", json!("dog")))
            .with_ordering(["-tasks:data.size"]),
    );
    assert_eq!(ids(&store, 1), vec![6, 4, 2]);

    let paged = store.load(1, true).unwrap().with_page(2, 2);
    store.save(1, paged);
    assert_eq!(ids(&store, 1), vec![2]);
}

/// Deleting a tab leaves a bare tab for lenient loads.
#[test]
fn test_deleted_tab() {
    let mut store = SessionTabStore::new();
    store.save(
        5,
        Tab::new(5).with_filter(FilterClause::new("filter:tasks:id", "greater", json!(4))),
    );
    assert_eq!(ids(&store, 5), vec![5, 6]);

    assert!(store.delete(5));
    assert_eq!(store.load(5, true), Err(DataManagerError::TabNotFound(5)));
    assert_eq!(ids(&store, 5), vec![1, 2, 3, 4, 5, 6]);
    assert!(!store.delete(5));
}

/// Tabs list in creation order with the default first.
#[test]
fn test_tab_listing_order() {
    let mut store = SessionTabStore::new();
    store.save(3, Tab::new(3).with_title("Three"));
    store.save(2, Tab::new(2).with_title("Two"));

    let titles: Vec<_> = store
        .tabs()
        .into_iter()
        .map(|t| t.title.unwrap_or_default())
        .collect();
    assert_eq!(titles, vec!["Tab 1", "Three", "Two"]);
}

/// One session's tabs are invisible to another.
#[test]
fn test_session_isolation() {
    let sessions = TabSessions::new();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    sessions.write(first, |store| {
        store.save(1, Tab::new(1).with_title("Mine"));
        store.save(2, Tab::new(2));
    });

    assert_eq!(sessions.read(first, |s| s.tabs().len()), 2);
    assert_eq!(sessions.read(second, |s| s.tabs().len()), 1);
    assert_eq!(
        sessions.read(second, |s| s.load(1, true).unwrap().title),
        Some("Tab 1".to_string())
    );
    assert!(!sessions.delete(second, 2));
}
