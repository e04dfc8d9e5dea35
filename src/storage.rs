//! Uploaded file storage for snippetd.
//!
//! Stores uploaded bytes in a flat directory keyed by the stored name
//! recorded in the files table.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{AppError, Result};

/// File storage service for managing uploaded bytes on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for file storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve the on-disk path for a stored name.
    ///
    /// Only the final path component of the name is used, so a stored
    /// name can never escape the base directory.
    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        let safe_name = Path::new(stored_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        self.base_path.join(safe_name)
    }

    /// Save content under the given stored name.
    pub fn save(&self, content: &[u8], stored_name: &str) -> Result<()> {
        fs::write(self.path_for(stored_name), content)?;
        Ok(())
    }

    /// Load content for a stored name.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        match fs::read(self.path_for(stored_name)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("file {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the bytes for a stored name.
    ///
    /// Deleting a name that was already removed is not an error.
    pub fn delete(&self, stored_name: &str) -> Result<()> {
        match fs::remove_file(self.path_for(stored_name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, storage) = test_storage();

        storage.save(b"hello", "abc-123").unwrap();
        assert_eq!(storage.load("abc-123").unwrap(), b"hello");
    }

    #[test]
    fn test_load_missing() {
        let (_dir, storage) = test_storage();

        let err = storage.load("missing").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (_dir, storage) = test_storage();

        storage.save(b"hello", "abc-123").unwrap();
        storage.delete("abc-123").unwrap();
        assert!(storage.load("abc-123").is_err());
        // Second delete is fine
        storage.delete("abc-123").unwrap();
    }

    #[test]
    fn test_path_traversal_is_contained() {
        let (_dir, storage) = test_storage();

        let path = storage.path_for("../../etc/passwd");
        assert!(path.starts_with(storage.base_path()));
        assert!(path.ends_with("passwd"));
    }
}
