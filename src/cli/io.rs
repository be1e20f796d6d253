//! JSON I/O handling for CLI
//!
//! Tabs are read from a file or stdin; results go to stdout as a single JSON
//! document wrapped in `{"status": "ok", "data": ...}`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde::Serialize;

use super::errors::{CliError, CliResult};
use crate::tabs::Tab;

/// Read a tab definition; `-` reads from stdin
pub fn read_tab(path: &Path) -> CliResult<Tab> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?
    };

    parse_tab(&content)
}

/// Parse a tab definition from JSON text
pub fn parse_tab(content: &str) -> CliResult<Tab> {
    if content.trim().is_empty() {
        return Err(CliError::invalid_tab("Empty tab definition"));
    }
    serde_json::from_str(content).map_err(|e| CliError::invalid_tab(e.to_string()))
}

/// Write a success response to stdout
pub fn write_response<T: Serialize>(data: &T) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
