//! File-based storage implementation for native platforms.

use super::{SlotStorage, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// File-based storage for native platforms.
///
/// Each slot is a JSON file in the base directory. Writes go to a temporary
/// file first and are renamed into place, so a crash never leaves a
/// half-written slot behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for slot files.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Linux: `~/.local/share/startpage/`
    /// On Windows: `%LOCALAPPDATA%\startpage\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                StorageError::Unavailable("Could not determine home directory".to_string())
            })?;
        Self::new(base.join("startpage"))
    }

    /// Get the file path for a slot key.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl SlotStorage for FileStorage {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", tmp.display(), e)))?;
        fs::rename(&tmp, &path).map_err(|e| {
            StorageError::Io(format!("Failed to replace {}: {}", path.display(), e))
        })
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_write_read() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        storage.write("new-tab-storage", r#"{"state":{}}"#).unwrap();
        let loaded = storage.read("new-tab-storage").unwrap();

        assert_eq!(loaded.as_deref(), Some(r#"{"state":{}}"#));
        assert!(dir.path().join("new-tab-storage.json").exists());
        assert!(!dir.path().join("new-tab-storage.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_missing_slot() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(storage.read("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_file_storage_overwrite_and_remove() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        storage.write("slot", "1").unwrap();
        storage.write("slot", "2").unwrap();
        assert_eq!(storage.read("slot").unwrap().as_deref(), Some("2"));

        storage.remove("slot").unwrap();
        assert!(!storage.slot_path("slot").exists());
        storage.remove("slot").unwrap();
    }

    #[test]
    fn test_slot_path_sanitization() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();

        let path = storage.slot_path("../etc/passwd");
        assert!(path.starts_with(dir.path()));
        assert!(path.to_string_lossy().contains("___etc_passwd"));
    }

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        FileStorage::new(nested.clone()).unwrap();
        assert!(nested.is_dir());
    }
}
