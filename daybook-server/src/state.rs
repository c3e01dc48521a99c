use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use daybook_core::{EventStore, FileStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn EventStore>,
}

impl AppState {
    /// Open the file store under `data_dir`, creating the directory first.
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        let store = FileStore::open(data_dir)?;
        Ok(Self::with_store(store))
    }

    pub fn with_store(store: impl EventStore + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &dyn EventStore {
        self.store.as_ref()
    }
}
