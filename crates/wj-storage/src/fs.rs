//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`], a thin wrapper over `std::fs` that maps I/O errors
//! into [`StorageError`] and returns directory listings in sorted order.

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::{Entry, EntryKind, Storage, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Stateless: every call goes straight to the operating system, so templates
/// and includes edited between two pages of the same build are picked up.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use wj_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new();
/// let template = storage.read(Path::new("site/_templates/base.html"))?;
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FsStorage;

impl FsStorage {
    /// Create a new filesystem storage.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn error(err: std::io::Error, path: &Path) -> StorageError {
        StorageError::io(err, Some(path.to_path_buf())).with_backend(BACKEND)
    }
}

impl Storage for FsStorage {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        let read_dir = fs::read_dir(dir).map_err(|e| Self::error(e, dir))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| Self::error(e, dir))?;
            let path: PathBuf = entry.path();

            // Follow symlinks so linked asset directories are traversed
            let Ok(metadata) = fs::metadata(&path) else {
                tracing::debug!(path = %path.display(), "Skipping unreadable entry");
                continue;
            };

            let kind = if metadata.is_dir() {
                EntryKind::Dir
            } else if metadata.is_file() {
                EntryKind::File
            } else {
                continue;
            };

            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                kind,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        fs::read_to_string(path).map_err(|e| Self::error(e, path))
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        fs::read(path).map_err(|e| Self::error(e, path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
        fs::write(path, contents).map_err(|e| Self::error(e, path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        fs::create_dir_all(path).map_err(|e| Self::error(e, path))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        fs::copy(from, to).map(|_| ()).map_err(|e| {
            // Blame the source only if it's the side that can't be opened
            let path = if fs::File::open(from).is_err() { from } else { to };
            Self::error(e, path)
        })
    }
}
