//! Tabs: saved view configurations and their session-scoped storage

mod store;
mod tab;

pub use store::{SessionTabStore, TabSessions, TabState, TabStore};
pub use tab::{FilterClause, Tab};
