//! Project: the task source and URI resolver a query runs against

mod columns;
mod store;
mod uri;

pub use columns::{column_type, make_columns, Column, Columns};
pub use store::{MemoryTaskStore, TaskStore};
pub use uri::{PassthroughResolver, SignedUrlResolver, StorageRef, UriResolver, STORAGE_SCHEMES};

use crate::record::DEFAULT_DATETIME_FORMAT;

/// A project whose collaborators are chosen at runtime
pub type SharedProject =
    Project<Box<dyn TaskStore + Send + Sync>, Box<dyn UriResolver + Send + Sync>>;

/// A project's collaborators and presentation settings
#[derive(Debug, Clone)]
pub struct Project<S: TaskStore, R: UriResolver> {
    store: S,
    resolver: R,
    data_keys: Vec<String>,
    datetime_format: String,
}

impl<S: TaskStore, R: UriResolver> Project<S, R> {
    pub fn new(store: S, resolver: R) -> Self {
        Self {
            store,
            resolver,
            data_keys: Vec::new(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }

    /// Sets the payload keys exposed as columns
    pub fn with_data_keys(mut self, keys: Vec<String>) -> Self {
        self.data_keys = keys;
        self
    }

    /// Sets the format used for completion timestamps
    pub fn with_datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = format.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn data_keys(&self) -> &[String] {
        &self.data_keys
    }

    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }

    /// Column schema for this project
    pub fn columns(&self) -> Columns {
        make_columns(&self.data_keys)
    }

    /// Erases the collaborator types
    pub fn into_shared(self) -> SharedProject
    where
        S: Send + Sync + 'static,
        R: Send + Sync + 'static,
    {
        let store: Box<dyn TaskStore + Send + Sync> = Box::new(self.store);
        let resolver: Box<dyn UriResolver + Send + Sync> = Box::new(self.resolver);
        Project {
            store,
            resolver,
            data_keys: self.data_keys,
            datetime_format: self.datetime_format,
        }
    }
}

impl<R: UriResolver> Project<MemoryTaskStore, R> {
    /// Builds a project whose columns cover every payload key in the store
    pub fn from_memory(store: MemoryTaskStore, resolver: R) -> Self {
        let keys = store.data_keys();
        Self::new(store, resolver).with_data_keys(keys)
    }
}
