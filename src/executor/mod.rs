//! Query executor for the data manager
//!
//! Turns a tab configuration into a page of tasks or annotations.
//!
//! # Execution Flow (strict order)
//!
//! 1. Compile filters from the tab
//! 2. Preload tasks (URI resolution only when `data.` fields are referenced)
//! 3. Filter under the tab's conjunction
//! 4. Sort by the first task-scoped ordering directive
//! 5. Paginate
//! 6. Resolve URIs on the returned page
//!
//! # Invariants
//!
//! - Null sort keys always come last, whatever the direction
//! - Sorting is stable
//! - `total` counts filtered tasks before pagination

mod executor;
mod filters;
mod operators;
mod pagination;
mod result;
mod sorter;
mod values;

pub use executor::{needs_uri_resolution, prepare_annotations, prepare_tasks, used_fields, QueryParams};
pub use filters::{CompiledFilter, Conjunction, FilterKey, FilterPlan, TaskFilter, TASKS_TARGET};
pub use operators::{evaluate, Operator, Predicate, Range};
pub use pagination::paginate;
pub use result::{AnnotationPage, TaskPage};
pub use sorter::{OrderKey, ResultSorter, SortDirection, SortSpec, CANCELLED_COLUMN, TASKS_PREFIX};
pub use values::{compare_values, is_truthy, partial_compare, values_equal};
