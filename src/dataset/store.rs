//! Dataset persistence backends.
//!
//! The orchestrator only sees [`DatasetStore`]; the local backend maps
//! dataset names to CSV files under a base directory and the in-memory
//! backend keeps clones behind a shared lock for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::codec::{read_csv, write_csv};
use super::table::Dataset;
use crate::error::{Error, Result};

/// Load/save capability for named datasets.
pub trait DatasetStore: Send + Sync {
    /// Load a dataset by name
    fn load(&self, name: &str) -> Result<Dataset>;

    /// Persist a dataset under a name, replacing any previous version
    fn save(&self, name: &str, data: &Dataset) -> Result<()>;

    /// Check if a dataset exists
    fn exists(&self, name: &str) -> bool;

    /// Backend type name
    fn store_type(&self) -> &'static str;
}

/// CSV files in a local directory
#[derive(Debug, Clone)]
pub struct LocalDatasetStore {
    base_path: PathBuf,
}

impl LocalDatasetStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// File path backing a dataset name.
    pub fn path_of(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

impl DatasetStore for LocalDatasetStore {
    fn load(&self, name: &str) -> Result<Dataset> {
        read_csv(self.path_of(name))
    }

    fn save(&self, name: &str, data: &Dataset) -> Result<()> {
        write_csv(self.path_of(name), data)
    }

    fn exists(&self, name: &str) -> bool {
        self.path_of(name).is_file()
    }

    fn store_type(&self) -> &'static str {
        "local"
    }
}

/// In-memory store; clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatasetStore {
    data: Arc<RwLock<HashMap<String, Dataset>>>,
}

impl InMemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given datasets.
    pub fn with(entries: impl IntoIterator<Item = (impl Into<String>, Dataset)>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.data.write() {
            map.extend(entries.into_iter().map(|(k, v)| (k.into(), v)));
        }
        store
    }
}

impl DatasetStore for InMemoryDatasetStore {
    fn load(&self, name: &str) -> Result<Dataset> {
        self.data
            .read()
            .map_err(|e| Error::state(format!("dataset store lock poisoned: {e}")))?
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Dataset {
                path: PathBuf::from(name),
                message: "not found".to_string(),
            })
    }

    fn save(&self, name: &str, data: &Dataset) -> Result<()> {
        self.data
            .write()
            .map_err(|e| Error::state(format!("dataset store lock poisoned: {e}")))?
            .insert(name.to_string(), data.clone());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.data.read().map(|m| m.contains_key(name)).unwrap_or(false)
    }

    fn store_type(&self) -> &'static str {
        "memory"
    }
}
