//! CLI module for the data manager
//!
//! Provides command-line interface for:
//! - tasks: One-shot task query against a tab
//! - annotations: One-shot annotation query against a tab
//! - columns: Column schema of a task file
//! - serve: HTTP API

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ProjectArgs, QueryArgs};
pub use commands::{annotations, columns, load_project, run, run_command, serve, tasks};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_tab, read_tab, write_response};
