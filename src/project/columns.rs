//! Column schema for the data manager frontend
//!
//! Payload columns point at their `data` parent and the `data` column lists
//! them as children, so the frontend can link both directions.

use serde::{Deserialize, Serialize};

/// A single column description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

impl Column {
    fn task(id: &str, title: &str, column_type: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            column_type: column_type.to_string(),
            target: "tasks".to_string(),
            parent: None,
            help: None,
            children: None,
        }
    }

    fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }
}

/// Column list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    pub columns: Vec<Column>,
}

/// Display type for a payload key
pub fn column_type(key: &str) -> &'static str {
    match key {
        "image" => "Image",
        "audio" => "Audio",
        "audioplus" => "AudioPlus",
        _ => "String",
    }
}

/// Builds the column schema for a project's payload keys
pub fn make_columns(data_keys: &[String]) -> Columns {
    let mut columns: Vec<Column> = data_keys
        .iter()
        .map(|key| Column {
            parent: Some("data".to_string()),
            ..Column::task(key, key, column_type(key))
        })
        .collect();

    columns.push(Column::task("id", "Task ID", "Number"));
    columns.push(
        Column::task("completed_at", "Completed at", "Datetime").with_help("Last completion date"),
    );
    columns.push(
        Column::task("total_completions", "Completion number", "String")
            .with_help("Total completions per task"),
    );
    columns.push(
        Column::task("has_cancelled_completions", "Cancelled", "Number")
            .with_help("Number of cancelled completions"),
    );
    columns.push(Column {
        children: Some(data_keys.to_vec()),
        ..Column::task("data", "data", "List")
    });

    Columns { columns }
}
