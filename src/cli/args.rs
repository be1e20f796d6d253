//! CLI argument definitions using clap
//!
//! Commands:
//! - datamanager tasks --input <tasks.json> [--tab <tab.json>]
//! - datamanager annotations --input <tasks.json> [--tab <tab.json>]
//! - datamanager columns --input <tasks.json>
//! - datamanager serve --input <tasks.json> [--port <port>]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// datamanager - filter, order and page annotation tasks
#[derive(Parser, Debug)]
#[command(name = "datamanager")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Path to configuration file
    #[arg(long, default_value = "./datamanager.json")]
    pub config: PathBuf,

    /// JSON file holding the project's tasks
    #[arg(long)]
    pub input: PathBuf,
}

/// Tab selection and pagination for one-shot queries
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// JSON file holding the tab to apply; `-` reads it from stdin
    #[arg(long)]
    pub tab: Option<PathBuf>,

    /// 1-based page number, overriding the tab's
    #[arg(long)]
    pub page: Option<i64>,

    /// Page size, overriding the tab's
    #[arg(long)]
    pub page_size: Option<i64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the tasks selected by a tab
    Tasks {
        #[command(flatten)]
        project: ProjectArgs,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Print the flattened completions of the tasks selected by a tab
    Annotations {
        #[command(flatten)]
        project: ProjectArgs,
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Print the column schema derived from the tasks
    Columns {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Serve the HTTP API
    Serve {
        #[command(flatten)]
        project: ProjectArgs,

        /// Port to bind, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
