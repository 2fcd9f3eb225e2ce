//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for abstracting directory traversal and
//! file I/O, along with [`StorageError`] for unified error handling across
//! backends.
//!
//! # Path Convention
//!
//! All path parameters are plain filesystem-style paths exactly as the caller
//! built them (typically `source_root.join(relative)`). Backends do not
//! resolve them against any root of their own.

use std::path::{Path, PathBuf};

/// Kind of a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
}

/// A single entry returned by [`Storage::list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Full path of the entry (the listed directory joined with the name).
    pub path: PathBuf,
    /// File or directory name, lossily converted to UTF-8.
    pub name: String,
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

impl Entry {
    /// Create a file entry inside `dir`.
    #[must_use]
    pub fn file(dir: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: dir.join(&name),
            name,
            kind: EntryKind::File,
        }
    }

    /// Create a directory entry inside `dir`.
    #[must_use]
    pub fn dir(dir: &Path, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: dir.join(&name),
            name,
            kind: EntryKind::Dir,
        }
    }

    /// True if this entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Resource already exists (for create operations).
    AlreadyExists,
    /// Expected a directory but found something else.
    NotADirectory,
    /// Content is not valid UTF-8 text.
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// True if this error means the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            std::io::ErrorKind::NotADirectory => StorageErrorKind::NotADirectory,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::AlreadyExists => "Already exists",
            StorageErrorKind::NotADirectory => "Not a directory",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Directory provider used by the site builder.
///
/// Covers exactly the operations a build performs: enumerate a directory,
/// read a page descriptor, template or asset, write an output file, and
/// create output directories. Implementations must return entries from
/// [`list`](Self::list) in a stable order.
pub trait Storage: Send + Sync {
    /// List the direct children of a directory.
    ///
    /// Entries are sorted by name. Entries that are neither regular files nor
    /// directories (sockets, broken symlinks) are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory doesn't exist or can't be read.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] with [`StorageErrorKind::NotFound`] if the file
    /// doesn't exist, or another kind if it can't be read.
    fn read(&self, path: &Path) -> Result<String, StorageError>;

    /// Read a file as raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist or can't be read.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, StorageError>;

    /// Check whether a directory exists at the given path.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn is_dir(&self, path: &Path) -> bool;

    /// Write a file, replacing any existing content.
    ///
    /// The parent directory must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file can't be written.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StorageError>;

    /// Create a directory and all missing ancestors.
    ///
    /// Succeeds without doing anything if the directory already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if any directory can't be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), StorageError>;

    /// Copy a file byte-for-byte, replacing the destination.
    ///
    /// The default implementation reads the whole source and writes it out.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the source can't be read or the destination
    /// can't be written.
    fn copy(&self, from: &Path, to: &Path) -> Result<(), StorageError> {
        let bytes = self.read_bytes(from)?;
        self.write(to, &bytes)
    }
}
