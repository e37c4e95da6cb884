use std::path::PathBuf;

use kurbo::Size;
use startpage_core::storage::{
    FileStorage, MemoryStorage, SlotStorage, StorageError, create_default_storage,
};
use startpage_core::store::ImportError;
use thiserror::Error;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "STARTPAGE_DATA_DIR";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error("Unknown widget: {0}")]
    UnknownWidget(String),
    #[error("Unknown anchor: {0}")]
    UnknownAnchor(String),
    #[error("The {0} widget is always shown")]
    NoToggle(&'static str),
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Host shell configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the slot file; `None` uses the platform default.
    pub data_dir: Option<PathBuf>,
    /// Viewport used when reporting resolved widget placements.
    pub viewport: Size,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            viewport: Size::new(1280.0, 800.0),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            ..Self::default()
        }
    }

    fn file_storage(&self) -> Result<FileStorage, StorageError> {
        match &self.data_dir {
            Some(dir) => FileStorage::new(dir.clone()),
            None => create_default_storage(),
        }
    }

    /// Open the slot storage. Falls back to memory when the data directory
    /// cannot be used, so the session still works without saving.
    pub fn open_storage(&self) -> Box<dyn SlotStorage> {
        match self.file_storage() {
            Ok(storage) => {
                log::info!("Using storage at {}", storage.base_path().display());
                Box::new(storage)
            }
            Err(e) => {
                log::warn!("Storage unavailable, changes will not be saved: {}", e);
                Box::new(MemoryStorage::new())
            }
        }
    }

    /// Path of the slot file, if it can be determined.
    pub fn slot_path(&self, key: &str) -> Option<PathBuf> {
        self.file_storage().ok().map(|storage| storage.slot_path(key))
    }
}
