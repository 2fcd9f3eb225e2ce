//! Per-file build outcomes.

use std::path::{Path, PathBuf};

use wj_renderer::RenderWarning;

use crate::error::FileError;

/// How the walker classified a source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    /// Page descriptor, rendered through a template.
    Page,
    /// Any other file, copied verbatim.
    Asset,
    /// A directory that couldn't be listed.
    Dir,
}

/// What happened to one source file.
#[derive(Debug)]
pub enum Outcome {
    /// Page rendered and written.
    Rendered {
        /// Written output path.
        output: PathBuf,
        /// Template used.
        template: String,
        /// Non-fatal problems (missing includes).
        warnings: Vec<RenderWarning>,
    },
    /// Asset copied.
    Copied {
        /// Written output path.
        output: PathBuf,
    },
    /// Page abandoned because of its content or references.
    Skipped(FileError),
    /// I/O failure; processing continued.
    Failed(FileError),
}

impl Outcome {
    /// Classify a file error as skipped or failed.
    pub(crate) fn from_error(error: FileError) -> Self {
        if error.is_skip() {
            Self::Skipped(error)
        } else {
            Self::Failed(error)
        }
    }

    /// The error behind a skipped or failed file.
    #[must_use]
    pub fn error(&self) -> Option<&FileError> {
        match self {
            Self::Skipped(e) | Self::Failed(e) => Some(e),
            Self::Rendered { .. } | Self::Copied { .. } => None,
        }
    }
}

/// Outcome for one source file.
#[derive(Debug)]
pub struct FileReport {
    /// Path relative to the source root.
    pub source: PathBuf,
    /// Page, asset or directory.
    pub kind: FileKind,
    /// What happened.
    pub outcome: Outcome,
}

impl FileReport {
    pub(crate) fn new(source: &Path, kind: FileKind, outcome: Outcome) -> Self {
        Self {
            source: source.to_path_buf(),
            kind,
            outcome,
        }
    }
}

/// Outcomes for every file a build visited, in traversal order.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Per-file reports.
    pub files: Vec<FileReport>,
}

impl BuildReport {
    /// Number of pages rendered.
    #[must_use]
    pub fn rendered(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Rendered { .. }))
    }

    /// Number of assets copied.
    #[must_use]
    pub fn copied(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Copied { .. }))
    }

    /// Number of pages skipped.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    /// Number of I/O failures.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// Number of render warnings across all pages.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.files
            .iter()
            .map(|f| match &f.outcome {
                Outcome::Rendered { warnings, .. } => warnings.len(),
                _ => 0,
            })
            .sum()
    }

    /// Look up the report for a source path relative to the source root.
    #[must_use]
    pub fn get(&self, source: impl AsRef<Path>) -> Option<&FileReport> {
        let source = source.as_ref();
        self.files.iter().find(|f| f.source == source)
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }
}
