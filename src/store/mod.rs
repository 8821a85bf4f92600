pub mod document;
pub mod inventory_file;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::types::{ActivityEntry, User, Warehouse};

pub use document::{write_json_atomic, JsonDocument};
pub use inventory_file::InventoryFile;

pub const INVENTORY_FILE: &str = "inventory.json";
pub const WAREHOUSES_FILE: &str = "warehouses.json";
pub const ACTIVITY_LOG_FILE: &str = "activity-log.json";
pub const USERS_FILE: &str = "users.json";

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to replace {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// All persistent state of the service, one document per file under `data_dir`
pub struct Store {
    data_dir: PathBuf,
    pub inventory: JsonDocument<InventoryFile>,
    pub warehouses: JsonDocument<Vec<Warehouse>>,
    pub activity: JsonDocument<Vec<ActivityEntry>>,
    pub users: JsonDocument<Vec<User>>,
}

impl Store {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|source| StoreError::Io {
            path: data_dir.clone(),
            source,
        })?;

        let store = Self {
            inventory: JsonDocument::open(data_dir.join(INVENTORY_FILE))?,
            warehouses: JsonDocument::open(data_dir.join(WAREHOUSES_FILE))?,
            activity: JsonDocument::open(data_dir.join(ACTIVITY_LOG_FILE))?,
            users: JsonDocument::open(data_dir.join(USERS_FILE))?,
            data_dir,
        };

        info!("Opened document store at {}", store.data_dir.display());
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Confirms the data directory is still reachable
    pub fn health_check(&self) -> Result<(), StoreError> {
        fs::metadata(&self.data_dir)
            .map(|_| ())
            .map_err(|source| StoreError::Io {
                path: self.data_dir.clone(),
                source,
            })
    }
}
