//! Durable storage for the single persisted state slot.
//!
//! Slot access is synchronous: a mutation is written through before the next
//! event is handled, so there is nothing to await.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Slot not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A key/value backend holding JSON strings.
///
/// Implementations can keep slots in memory, in files, or in the browser's
/// `localStorage`.
pub trait SlotStorage {
    /// Read a slot. A missing slot is `Ok(None)`, not an error.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Replace a slot's contents.
    fn write(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a slot. Deleting a missing slot succeeds.
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    /// Read a slot that must exist.
    fn read_required(&self, key: &str) -> StorageResult<String> {
        self.read(key)?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

impl<S: SlotStorage + ?Sized> SlotStorage for Box<S> {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Platform-specific storage type.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = FileStorage;

/// Platform-specific storage type.
#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = LocalStorage;

/// Create the default storage for the current platform.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<PlatformStorage> {
    FileStorage::default_location()
}

/// Create the default storage for the current platform.
#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<PlatformStorage> {
    LocalStorage::new()
}
