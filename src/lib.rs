//! datamanager - task filtering, ordering and pagination for annotation projects
//!
//! A tab is a saved view over a project's tasks: filter clauses joined by a
//! conjunction, an ordering, and a page. [`executor::prepare_tasks`] turns a
//! tab into one page of tasks; [`executor::prepare_annotations`] flattens the
//! completions of those tasks into a page of annotations.

pub mod cli;
pub mod config;
pub mod errors;
pub mod executor;
pub mod http_server;
pub mod logging;
pub mod project;
pub mod record;
pub mod tabs;
