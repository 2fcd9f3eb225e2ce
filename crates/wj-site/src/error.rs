//! Build error types.
//!
//! [`BuildError`] aborts the whole build. [`FileError`] describes why a
//! single file was skipped or failed; it is recorded in the build report and
//! never stops traversal.

use std::path::PathBuf;

use wj_renderer::DescriptorError;
use wj_storage::StorageError;

/// Error that stops the build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Source root doesn't exist or isn't a directory.
    #[error("Invalid source directory: {}", .0.display())]
    InvalidSourceDir(PathBuf),
    /// Output root is the source root itself; copying assets would truncate them.
    #[error("Output directory must differ from the source directory: {}", .0.display())]
    OutputIsSource(PathBuf),
    /// An output directory couldn't be created.
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory that couldn't be created.
        path: PathBuf,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
}

/// Problem with one source file.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    /// Source directory couldn't be listed.
    #[error("Failed to read directory: {0}")]
    ListDir(#[source] StorageError),
    /// Page descriptor couldn't be read.
    #[error("Failed to read page descriptor: {0}")]
    Read(#[source] StorageError),
    /// Page descriptor isn't a JSON object of strings.
    #[error("Invalid page descriptor: {0}")]
    Descriptor(#[from] DescriptorError),
    /// Descriptor has no (or an empty) `template` property.
    #[error("No template specified")]
    NoTemplate,
    /// Named template doesn't exist.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    /// Named template exists but couldn't be read.
    #[error("Failed to read template {name}: {source}")]
    TemplateUnreadable {
        /// Template name.
        name: String,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
    /// Rendered page couldn't be written.
    #[error("Failed to output HTML file {}: {source}", .path.display())]
    Write {
        /// Output path.
        path: PathBuf,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
    /// Asset couldn't be copied.
    #[error("Failed to copy file to {}: {source}", .path.display())]
    Copy {
        /// Output path.
        path: PathBuf,
        /// Underlying storage error.
        #[source]
        source: StorageError,
    },
}

impl FileError {
    /// True for problems with the page's content or references, as opposed
    /// to I/O failures.
    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::Descriptor(_) | Self::NoTemplate | Self::TemplateNotFound(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use wj_renderer::PageDescriptor;

    use super::*;

    #[test]
    fn test_build_error_messages() {
        let err = BuildError::InvalidSourceDir(PathBuf::from("missing"));
        assert_eq!(err.to_string(), "Invalid source directory: missing");

        let err = BuildError::CreateDir {
            path: PathBuf::from("/out/blog"),
            source: StorageError::not_found(Path::new("/out")),
        };
        assert!(
            err.to_string()
                .starts_with("Failed to create output directory /out/blog")
        );
    }

    #[test]
    fn test_file_error_classification() {
        let descriptor_err = PageDescriptor::parse("[]").unwrap_err();

        assert!(FileError::NoTemplate.is_skip());
        assert!(FileError::TemplateNotFound("base".to_owned()).is_skip());
        assert!(FileError::from(descriptor_err).is_skip());
        assert!(!FileError::Read(StorageError::not_found("/src/page.json")).is_skip());
        assert!(
            !FileError::Write {
                path: PathBuf::from("/out/page.html"),
                source: StorageError::not_found("/out"),
            }
            .is_skip()
        );
    }

    #[test]
    fn test_file_error_messages() {
        assert_eq!(FileError::NoTemplate.to_string(), "No template specified");
        assert_eq!(
            FileError::TemplateNotFound("base".to_owned()).to_string(),
            "Template not found: base"
        );
    }
}
