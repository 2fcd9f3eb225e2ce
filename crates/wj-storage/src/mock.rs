//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`], an in-memory filesystem for unit testing the
//! site builder without disk access.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::storage::{Entry, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Ancestors of a path, excluding the path itself and the empty path.
fn ancestors(path: &Path) -> impl Iterator<Item = &Path> {
    path.ancestors()
        .skip(1)
        .filter(|p| !p.as_os_str().is_empty())
}

/// Mock storage for testing.
///
/// Stores files and directories in memory. Adding a file implicitly creates
/// all of its ancestor directories. Use the builder methods to configure the
/// mock with test data and injected failures.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use wj_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("/src/_templates/base.html", "<p>[{title}]</p>")
///     .with_file("/src/page.json", r#"{"template":"base","title":"Hi"}"#);
///
/// let entries = storage.list(Path::new("/src")).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: RwLock<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
    failing_dirs: RwLock<BTreeSet<PathBuf>>,
    failing_writes: RwLock<BTreeSet<PathBuf>>,
    writes: RwLock<Vec<PathBuf>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content, creating its ancestor directories.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl AsRef<[u8]>) -> Self {
        let path: PathBuf = path.into();
        self.insert_ancestors(&path);
        self.files
            .write()
            .unwrap()
            .insert(path, content.as_ref().to_vec());
        self
    }

    /// Add an empty directory, creating its ancestors.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        self.insert_ancestors(&path);
        self.dirs.write().unwrap().insert(path);
        self
    }

    /// Make `create_dir_all` fail whenever it would have to create `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_dir(self, path: impl Into<PathBuf>) -> Self {
        self.failing_dirs.write().unwrap().insert(path.into());
        self
    }

    /// Make `write` (and therefore `copy`) fail for `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_write(self, path: impl Into<PathBuf>) -> Self {
        self.failing_writes.write().unwrap().insert(path.into());
        self
    }

    /// Get the current content of a file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.read().unwrap().get(path.as_ref()).cloned()
    }

    /// Get the current content of a file as UTF-8 text.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn file_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.file(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Check whether a directory has been created or added.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.read().unwrap().contains(path.as_ref())
    }

    /// Paths passed to successful `write` calls, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn written(&self) -> Vec<PathBuf> {
        self.writes.read().unwrap().clone()
    }

    fn insert_ancestors(&self, path: &Path) {
        let mut dirs = self.dirs.write().unwrap();
        for ancestor in ancestors(path) {
            dirs.insert(ancestor.to_path_buf());
        }
    }

    fn error(kind: StorageErrorKind, path: &Path) -> StorageError {
        StorageError::new(kind).with_path(path).with_backend(BACKEND)
    }
}

impl Storage for MockStorage {
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        if !self.has_dir(dir) {
            return Err(Self::error(StorageErrorKind::NotFound, dir));
        }

        let files = self.files.read().unwrap();
        let dirs = self.dirs.read().unwrap();

        let child_name = |path: &Path| -> Option<String> {
            (path.parent() == Some(dir))
                .then(|| path.file_name())
                .flatten()
                .map(|name| name.to_string_lossy().into_owned())
        };

        let mut entries: Vec<Entry> = files
            .keys()
            .filter_map(|path| child_name(path.as_path()).map(|name| Entry::file(dir, name)))
            .chain(
                dirs.iter()
                    .filter_map(|path| child_name(path.as_path()).map(|name| Entry::dir(dir, name))),
            )
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        let bytes = self.read_bytes(path)?;
        String::from_utf8(bytes).map_err(|e| {
            Self::error(StorageErrorKind::InvalidData, path).with_source(e)
        })
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError> {
        self.file(path)
            .ok_or_else(|| Self::error(StorageErrorKind::NotFound, path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.has_dir(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
        if self.failing_writes.read().unwrap().contains(path) {
            return Err(Self::error(StorageErrorKind::PermissionDenied, path));
        }
        if self.has_dir(path) {
            return Err(Self::error(StorageErrorKind::AlreadyExists, path));
        }
        if let Some(parent) = ancestors(path).next()
            && !self.has_dir(parent)
        {
            return Err(Self::error(StorageErrorKind::NotFound, path));
        }

        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_vec());
        self.writes.write().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError> {
        let failing = self.failing_dirs.read().unwrap();
        let files = self.files.read().unwrap();
        let mut dirs = self.dirs.write().unwrap();

        let mut missing: Vec<&Path> = std::iter::once(path)
            .chain(ancestors(path))
            .take_while(|p| !dirs.contains(*p))
            .collect();
        missing.reverse();

        for dir in &missing {
            if failing.contains(*dir) {
                return Err(Self::error(StorageErrorKind::PermissionDenied, dir));
            }
            if files.contains_key(*dir) {
                return Err(Self::error(StorageErrorKind::NotADirectory, dir));
            }
        }

        dirs.extend(missing.into_iter().map(Path::to_path_buf));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::storage::EntryKind;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_mock_storage_is_send_sync() {
        assert_send_sync::<MockStorage>();
    }

    #[test]
    fn test_with_file_creates_ancestors() {
        let storage = MockStorage::new().with_file("/src/blog/post.json", "{}");

        assert!(storage.is_dir(Path::new("/src/blog")));
        assert!(storage.is_dir(Path::new("/src")));
        assert!(!storage.is_dir(Path::new("/src/blog/post.json")));
    }

    #[test]
    fn test_list_direct_children_only() {
        let storage = MockStorage::new()
            .with_file("/src/b.css", "b")
            .with_file("/src/a.json", "{}")
            .with_file("/src/blog/post.json", "{}")
            .with_dir("/src/_drafts");

        let entries = storage.list(Path::new("/src")).unwrap();

        let summary: Vec<_> = entries
            .iter()
            .map(|e| (e.name.as_str(), e.kind))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("_drafts", EntryKind::Dir),
                ("a.json", EntryKind::File),
                ("b.css", EntryKind::File),
                ("blog", EntryKind::Dir),
            ]
        );
    }

    #[test]
    fn test_list_missing_dir() {
        let err = MockStorage::new().list(Path::new("/nope")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_read_missing() {
        let err = MockStorage::new()
            .read(Path::new("/src/missing.html"))
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.path.as_deref(), Some(Path::new("/src/missing.html")));
    }

    #[test]
    fn test_read_invalid_utf8() {
        let storage = MockStorage::new().with_file("/src/bad.json", [0xffu8, 0xfe]);

        let err = storage.read(Path::new("/src/bad.json")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::InvalidData);
    }

    #[test]
    fn test_write_requires_parent() {
        let storage = MockStorage::new();

        let err = storage
            .write(Path::new("/out/page.html"), b"x")
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[test]
    fn test_write_records_order() {
        let storage = MockStorage::new().with_dir("/out");

        storage.write(Path::new("/out/b.html"), b"b").unwrap();
        storage.write(Path::new("/out/a.html"), b"a").unwrap();

        assert_eq!(
            storage.written(),
            vec![PathBuf::from("/out/b.html"), PathBuf::from("/out/a.html")]
        );
        assert_eq!(storage.file_string("/out/a.html").as_deref(), Some("a"));
    }

    #[test]
    fn test_failing_write() {
        let storage = MockStorage::new()
            .with_dir("/out")
            .with_failing_write("/out/locked.html");

        let err = storage
            .write(Path::new("/out/locked.html"), b"x")
            .unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
        assert!(storage.written().is_empty());
    }

    #[test]
    fn test_create_dir_all() {
        let storage = MockStorage::new();

        storage.create_dir_all(Path::new("/out/a/b")).unwrap();

        assert!(storage.has_dir("/out"));
        assert!(storage.has_dir("/out/a"));
        assert!(storage.has_dir("/out/a/b"));
    }

    #[test]
    fn test_failing_dir_creates_nothing() {
        let storage = MockStorage::new().with_failing_dir("/out/a");

        let err = storage.create_dir_all(Path::new("/out/a/b")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
        assert_eq!(err.path.as_deref(), Some(Path::new("/out/a")));
        assert!(!storage.has_dir("/out"));
    }

    #[test]
    fn test_failing_dir_ignored_when_already_present() {
        let storage = MockStorage::new()
            .with_dir("/out/a")
            .with_failing_dir("/out/a");

        storage.create_dir_all(Path::new("/out/a/b")).unwrap();

        assert!(storage.has_dir("/out/a/b"));
    }

    #[test]
    fn test_copy_uses_default_impl() {
        let storage = MockStorage::new()
            .with_file("/src/logo.png", [1u8, 2, 3])
            .with_dir("/out");

        storage
            .copy(Path::new("/src/logo.png"), Path::new("/out/logo.png"))
            .unwrap();

        assert_eq!(storage.file("/out/logo.png"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_copy_failure_names_destination() {
        let storage = MockStorage::new()
            .with_file("/src/logo.png", [1u8])
            .with_dir("/out")
            .with_failing_write("/out/logo.png");

        let err = storage
            .copy(Path::new("/src/logo.png"), Path::new("/out/logo.png"))
            .unwrap_err();

        assert_eq!(err.path.as_deref(), Some(Path::new("/out/logo.png")));
    }
}
