//! Include lookup over a storage backend.

use std::path::{Path, PathBuf};

use wj_renderer::{IncludeError, IncludeSource};
use wj_storage::Storage;

/// Resolves `[@name@]` to `<includes_dir>/<name>.<extension>`.
///
/// Nothing is cached: each page render reads its includes afresh.
pub(crate) struct StorageIncludes<'a> {
    storage: &'a dyn Storage,
    includes_dir: &'a Path,
    extension: &'a str,
}

impl<'a> StorageIncludes<'a> {
    pub(crate) fn new(storage: &'a dyn Storage, includes_dir: &'a Path, extension: &'a str) -> Self {
        Self {
            storage,
            includes_dir,
            extension,
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.includes_dir.join(format!("{name}.{}", self.extension))
    }
}

impl IncludeSource for StorageIncludes<'_> {
    fn include(&self, name: &str) -> Result<Option<String>, IncludeError> {
        match self.storage.read(&self.path(name)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wj_storage::MockStorage;

    use super::*;

    #[test]
    fn test_found() {
        let storage = MockStorage::new().with_file("/src/_includes/nav.html", "<nav/>");
        let includes = StorageIncludes::new(&storage, Path::new("/src/_includes"), "html");

        assert_eq!(includes.include("nav").unwrap().as_deref(), Some("<nav/>"));
    }

    #[test]
    fn test_missing() {
        let storage = MockStorage::new().with_dir("/src/_includes");
        let includes = StorageIncludes::new(&storage, Path::new("/src/_includes"), "html");

        assert!(includes.include("footer").unwrap().is_none());
    }

    #[test]
    fn test_unreadable_is_error() {
        let storage = MockStorage::new().with_file("/src/_includes/bad.html", [0xffu8, 0xfe]);
        let includes = StorageIncludes::new(&storage, Path::new("/src/_includes"), "html");

        assert!(includes.include("bad").is_err());
    }
}
