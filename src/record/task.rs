//! Task and completion records
//!
//! A task is a typed record with a fixed set of known attributes, the `data`
//! payload bag, and an `extra` bag holding any other top-level keys. Unknown
//! keys round-trip through serde untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Completion creation time.
///
/// Inputs carry epoch seconds; flattened annotations carry a formatted string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompletionTime {
    /// Seconds since the Unix epoch
    Epoch(i64),
    /// Already formatted timestamp
    Formatted(String),
}

impl CompletionTime {
    /// Returns the epoch seconds if this time has not been formatted yet
    pub fn epoch(&self) -> Option<i64> {
        match self {
            CompletionTime::Epoch(secs) => Some(*secs),
            CompletionTime::Formatted(_) => None,
        }
    }
}

/// A single labeling result attached to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Completion identifier
    pub id: i64,

    /// Creation time, null when unknown
    #[serde(default)]
    pub created_at: Option<CompletionTime>,

    /// Owning task, stamped when completions are flattened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,

    /// Any other completion fields (result, lead_time, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Completion {
    /// Create a completion with an epoch creation time
    pub fn new(id: i64, created_at: Option<i64>) -> Self {
        Self {
            id,
            created_at: created_at.map(CompletionTime::Epoch),
            task_id: None,
            extra: Map::new(),
        }
    }

    /// Whether the annotator skipped this task
    pub fn was_cancelled(&self) -> bool {
        self.extra
            .get("was_cancelled")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Sets an extra field
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// The primary queried record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique, immutable task identifier
    pub id: i64,

    /// Domain payload addressed with `data.<key>` field paths
    #[serde(default)]
    pub data: Map<String, Value>,

    /// Completions in storage order
    #[serde(default)]
    pub completions: Vec<Completion>,

    /// Formatted time of the latest completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,

    /// Number of completions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_completions: Option<u64>,

    /// Number of cancelled completions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_cancelled_completions: Option<i64>,

    /// Any other top-level task keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Create an empty task
    pub fn new(id: i64) -> Self {
        Self {
            id,
            data: Map::new(),
            completions: Vec::new(),
            completed_at: None,
            total_completions: None,
            has_cancelled_completions: None,
            extra: Map::new(),
        }
    }

    /// Builder: set a `data` key
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Builder: append a completion
    pub fn with_completion(mut self, completion: Completion) -> Self {
        self.completions.push(completion);
        self
    }

    /// Returns a top-level attribute, JSON null when absent
    pub fn attribute(&self, name: &str) -> Value {
        match name {
            "id" => Value::from(self.id),
            "data" => Value::Object(self.data.clone()),
            "completions" => {
                serde_json::to_value(&self.completions).unwrap_or(Value::Null)
            }
            "completed_at" => self
                .completed_at
                .as_ref()
                .map_or(Value::Null, |s| Value::String(s.clone())),
            "total_completions" => self.total_completions.map_or(Value::Null, Value::from),
            "has_cancelled_completions" => self
                .has_cancelled_completions
                .map_or(Value::Null, Value::from),
            other => self.extra.get(other).cloned().unwrap_or(Value::Null),
        }
    }
}
