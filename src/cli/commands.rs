//! CLI command implementations
//!
//! Every command loads configuration, installs logging, then loads the task
//! file into memory before doing its work.

use std::path::Path;

use crate::config::DataManagerConfig;
use crate::executor::{prepare_annotations, prepare_tasks, QueryParams};
use crate::http_server::{AppState, HttpServer};
use crate::logging::init_logging;
use crate::project::{MemoryTaskStore, Project, SharedProject};

use super::args::{Command, ProjectArgs, QueryArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_tab, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Tasks { project, query } => tasks(&project, &query),
        Command::Annotations { project, query } => annotations(&project, &query),
        Command::Columns { project } => columns(&project),
        Command::Serve { project, port } => serve(&project, port),
    }
}

/// Print the page of tasks a tab selects
pub fn tasks(args: &ProjectArgs, query: &QueryArgs) -> CliResult<()> {
    let (_, project) = boot(args)?;
    let params = query_params(query)?;

    let page = prepare_tasks(&project, &params)?;
    write_response(&page)
}

/// Print the page of annotations a tab selects
pub fn annotations(args: &ProjectArgs, query: &QueryArgs) -> CliResult<()> {
    let (config, project) = boot(args)?;
    let params = query_params(query)?;

    let tasks = prepare_tasks(&project, &params.unpaginated())?;
    let page = prepare_annotations(&tasks.tasks, &params, &config.datetime_format);
    write_response(&page)
}

/// Print the column schema
pub fn columns(args: &ProjectArgs) -> CliResult<()> {
    let (_, project) = boot(args)?;
    write_response(&project.columns())
}

/// Serve the HTTP API until the process is stopped
pub fn serve(args: &ProjectArgs, port: Option<u16>) -> CliResult<()> {
    let (mut config, project) = boot(args)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let server = HttpServer::with_config(config.http, AppState::new(project));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::failed(format!("HTTP server failed: {}", e)))
    })
}

/// Load configuration and tasks, then install logging
fn boot(args: &ProjectArgs) -> CliResult<(DataManagerConfig, SharedProject)> {
    let config = DataManagerConfig::load(&args.config)?;
    init_logging(&config.log);

    let project = load_project(&config, &args.input)?;
    Ok((config, project))
}

/// Build a project over a task file using the configured resolver
pub fn load_project(config: &DataManagerConfig, input: &Path) -> CliResult<SharedProject> {
    let store = MemoryTaskStore::load_json(input)?;
    tracing::info!(event = "TASKS_LOADED", path = %input.display(), count = store.len());

    Ok(Project::from_memory(store, config.storage.resolver()?)
        .with_datetime_format(config.datetime_format.clone())
        .into_shared())
}

fn query_params(query: &QueryArgs) -> CliResult<QueryParams> {
    let tab = query.tab.as_deref().map(read_tab).transpose()?;
    Ok(QueryParams::new(tab).with_overrides(query.page, query.page_size))
}
