//! Field path resolution
//!
//! `data.<key>` paths address the task payload; every other path addresses a
//! top-level attribute. Absence resolves to JSON null, never an error.

use serde_json::Value;

use super::task::Task;

/// Prefix selecting the task payload bag
pub const DATA_PREFIX: &str = "data.";

/// Resolves a field path against a task
pub fn resolve_field(task: &Task, path: &str) -> Value {
    match path.strip_prefix(DATA_PREFIX) {
        Some(key) => task.data.get(key).cloned().unwrap_or(Value::Null),
        None => task.attribute(path),
    }
}

/// Returns true if the path lives under the payload bag
pub fn is_data_field(path: &str) -> bool {
    path.starts_with(DATA_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_prefix() {
        let task = Task::new(1).with_data("x", json!("a"));
        assert_eq!(resolve_field(&task, "data.x"), json!("a"));
        assert_eq!(resolve_field(&task, "data.y"), Value::Null);
    }

    #[test]
    fn test_top_level() {
        let task = Task::new(42);
        assert_eq!(resolve_field(&task, "id"), json!(42));
        assert_eq!(resolve_field(&task, "total_completions"), Value::Null);
    }

    #[test]
    fn test_data_key_is_not_top_level() {
        // "x" without prefix must not fall through to the payload
        let task = Task::new(1).with_data("x", json!("a"));
        assert_eq!(resolve_field(&task, "x"), Value::Null);
    }

    #[test]
    fn test_is_data_field() {
        assert!(is_data_field("data.image"));
        assert!(!is_data_field("id"));
        assert!(!is_data_field("metadata.x"));
    }
}
