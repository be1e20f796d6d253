//! Record model for the data manager
//!
//! Tasks, their completions, and field path resolution.

mod field;
mod task;
mod timestamp;

pub use field::{is_data_field, resolve_field, DATA_PREFIX};
pub use task::{Completion, CompletionTime, Task};
pub use timestamp::{format_local, is_valid_format, DEFAULT_DATETIME_FORMAT};
