//! Session-scoped tab storage
//!
//! Tab state never leaks across sessions. A session that has not saved
//! anything sees the default tab set; the first save materialises it.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tab::Tab;
use crate::errors::{DataManagerError, DmResult};

/// Tab CRUD over one session's state
pub trait TabStore {
    /// Load a tab by id.
    ///
    /// An absent id yields a fresh `{id}` tab unless `require_existing` is set,
    /// in which case the result is [`DataManagerError::TabNotFound`].
    fn load(&self, tab_id: i64, require_existing: bool) -> DmResult<Tab>;

    /// Upsert a tab; `tab.id` is forced to `tab_id`.
    fn save(&mut self, tab_id: i64, tab: Tab) -> Tab;

    /// Delete a tab, returning false when it did not exist.
    fn delete(&mut self, tab_id: i64) -> bool;

    /// All tabs in creation order
    fn tabs(&self) -> Vec<Tab>;
}

/// Persisted tab collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabState {
    pub tabs: Vec<Tab>,
}

impl Default for TabState {
    fn default() -> Self {
        Self {
            tabs: vec![Tab::new(1).with_title("Tab 1")],
        }
    }
}

/// In-memory tab store for one session
#[derive(Debug, Clone, Default)]
pub struct SessionTabStore {
    /// `None` until the session saves its first tab
    state: Option<TabState>,
}

impl SessionTabStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a session from previously exported state
    pub fn from_state(state: TabState) -> Self {
        Self { state: Some(state) }
    }

    /// Export the session state, if any was saved
    pub fn state(&self) -> Option<&TabState> {
        self.state.as_ref()
    }
}

impl TabStore for SessionTabStore {
    fn load(&self, tab_id: i64, require_existing: bool) -> DmResult<Tab> {
        let default_state;
        let state = match &self.state {
            Some(state) => state,
            None => {
                default_state = TabState::default();
                &default_state
            }
        };

        match state.tabs.iter().find(|tab| tab.id == tab_id) {
            Some(tab) => Ok(tab.clone()),
            None if require_existing => Err(DataManagerError::TabNotFound(tab_id)),
            None => Ok(Tab::new(tab_id)),
        }
    }

    fn save(&mut self, tab_id: i64, mut tab: Tab) -> Tab {
        tab.id = tab_id;
        let state = self.state.get_or_insert_with(TabState::default);

        match state.tabs.iter_mut().find(|existing| existing.id == tab_id) {
            Some(existing) => *existing = tab.clone(),
            None => state.tabs.push(tab.clone()),
        }

        tracing::debug!(event = "TAB_SAVED", tab_id, "tab saved");
        tab
    }

    fn delete(&mut self, tab_id: i64) -> bool {
        let Some(state) = self.state.as_mut() else {
            return false;
        };

        match state.tabs.iter().position(|tab| tab.id == tab_id) {
            Some(index) => {
                state.tabs.remove(index);
                tracing::debug!(event = "TAB_DELETED", tab_id, "tab deleted");
                true
            }
            None => false,
        }
    }

    fn tabs(&self) -> Vec<Tab> {
        match &self.state {
            Some(state) => state.tabs.clone(),
            None => TabState::default().tabs,
        }
    }
}

/// Registry of per-session tab stores
#[derive(Debug, Default)]
pub struct TabSessions {
    sessions: RwLock<HashMap<Uuid, SessionTabStore>>,
}

impl TabSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a read-only closure against a session's store
    pub fn read<T>(&self, session: Uuid, f: impl FnOnce(&SessionTabStore) -> T) -> T {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        match sessions.get(&session) {
            Some(store) => f(store),
            None => f(&SessionTabStore::new()),
        }
    }

    /// Run a mutating closure against a session's store, creating it if needed
    pub fn write<T>(&self, session: Uuid, f: impl FnOnce(&mut SessionTabStore) -> T) -> T {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        f(sessions.entry(session).or_default())
    }

    /// Delete a tab without creating state for an unknown session
    pub fn delete(&self, session: Uuid, tab_id: i64) -> bool {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        match sessions.get_mut(&session) {
            Some(store) => store.delete(tab_id),
            None => false,
        }
    }

    /// Number of sessions holding state
    pub fn session_count(&self) -> usize {
        self.sessions.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
