//! Source tree traversal.
//!
//! The walker visits the source root depth-first. In each directory it
//! handles files first, then subdirectories, both in name order:
//!
//! - files with the data extension are rendered as pages;
//! - every other file is copied byte-for-byte;
//! - subdirectories starting with the excluded prefix are skipped, as is the
//!   output root when it lies inside the source root.
//!
//! Output directories are created lazily, right before the first file is
//! written into them. Failing to create one aborts the build; every other
//! problem is recorded in the [`BuildReport`] and traversal continues.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use wj_config::Config;
use wj_storage::{Entry, Storage};

use crate::error::{BuildError, FileError};
use crate::page::PageRenderer;
use crate::report::{BuildReport, FileKind, FileReport, Outcome};

/// Configuration for a build.
///
/// Constructed once at startup and shared read-only by the walker and the
/// page renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    /// Source root.
    pub source_dir: PathBuf,
    /// Output root.
    pub output_dir: PathBuf,
    /// Template directory (full path, inside the source root).
    pub templates_dir: PathBuf,
    /// Include directory (full path, inside the source root).
    pub includes_dir: PathBuf,
    /// Subdirectories whose names start with this are not traversed.
    pub excluded_prefix: String,
    /// Extension marking page descriptors (without the dot).
    pub data_extension: String,
    /// Extension of rendered pages, templates and includes (without the dot).
    pub output_extension: String,
    /// Configuration file the layout was loaded from. Never copied to output.
    pub config_path: Option<PathBuf>,
}

impl BuildConfig {
    /// Default layout for the given source and output roots.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let config = Config {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            ..Config::default()
        };
        Self::from_config(&config)
    }

    /// Build configuration from a loaded [`Config`].
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_dir: config.source_dir.clone(),
            output_dir: config.output_dir.clone(),
            templates_dir: config.templates_dir(),
            includes_dir: config.includes_dir(),
            excluded_prefix: config.layout.excluded_prefix.clone(),
            data_extension: config.pages.data_extension.clone(),
            output_extension: config.pages.output_extension.clone(),
            config_path: config.config_path.clone(),
        }
    }
}

/// Progress notification emitted while building.
#[derive(Debug)]
pub enum BuildEvent<'a> {
    /// About to process a directory (relative to the source root).
    EnterDir {
        /// Directory path relative to the source root.
        relative: &'a Path,
    },
    /// A file (or unlistable directory) was processed.
    File(&'a FileReport),
}

/// Builds a site from a storage backend.
pub struct SiteBuilder {
    storage: Arc<dyn Storage>,
    config: BuildConfig,
}

impl SiteBuilder {
    /// Create a new site builder.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: BuildConfig) -> Self {
        Self { storage, config }
    }

    /// Build configuration.
    #[must_use]
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Build the site.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the source root isn't a directory or an output
    /// directory can't be created.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        self.build_with(&mut |_| {})
    }

    /// Build the site, reporting progress to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the source root isn't a directory or an output
    /// directory can't be created. Files processed before the failure stay
    /// written.
    pub fn build_with(
        &self,
        observer: &mut dyn FnMut(BuildEvent<'_>),
    ) -> Result<BuildReport, BuildError> {
        let config = &self.config;
        if !self.storage.is_dir(&config.source_dir) {
            return Err(BuildError::InvalidSourceDir(config.source_dir.clone()));
        }

        let output_root = normalize(&config.output_dir);
        if output_root == normalize(&config.source_dir) {
            return Err(BuildError::OutputIsSource(config.output_dir.clone()));
        }

        tracing::info!(
            source = %config.source_dir.display(),
            output = %config.output_dir.display(),
            "Building site"
        );

        let mut walk = Walk {
            storage: self.storage.as_ref(),
            config,
            renderer: PageRenderer::new(self.storage.as_ref(), config),
            output_root,
            config_file: config.config_path.as_deref().map(normalize),
            report: BuildReport::default(),
            observer,
        };
        walk.visit_dir(Path::new(""))?;

        let report = walk.report;
        tracing::info!(
            rendered = report.rendered(),
            copied = report.copied(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Build complete"
        );
        Ok(report)
    }
}

/// State of one traversal.
struct Walk<'a, 'o> {
    storage: &'a dyn Storage,
    config: &'a BuildConfig,
    renderer: PageRenderer<'a>,
    output_root: PathBuf,
    config_file: Option<PathBuf>,
    report: BuildReport,
    observer: &'o mut dyn FnMut(BuildEvent<'_>),
}

impl Walk<'_, '_> {
    fn visit_dir(&mut self, relative: &Path) -> Result<(), BuildError> {
        let dir = self.config.source_dir.join(relative);
        tracing::info!(dir = %relative.display(), "Processing directory");
        (self.observer)(BuildEvent::EnterDir { relative });

        let entries = match self.storage.list(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to read directory");
                self.record(FileReport::new(
                    relative,
                    FileKind::Dir,
                    Outcome::Failed(FileError::ListDir(e)),
                ));
                return Ok(());
            }
        };

        let (dirs, files): (Vec<Entry>, Vec<Entry>) =
            entries.into_iter().partition(Entry::is_dir);

        for file in &files {
            self.visit_file(relative, file)?;
        }

        for sub in &dirs {
            if sub.name.starts_with(self.config.excluded_prefix.as_str()) {
                tracing::debug!(dir = %sub.path.display(), "Skipping excluded directory");
                continue;
            }
            if normalize(&sub.path) == self.output_root {
                tracing::debug!(dir = %sub.path.display(), "Skipping output directory");
                continue;
            }
            self.visit_dir(&child(relative, sub))?;
        }

        Ok(())
    }

    fn visit_file(&mut self, relative: &Path, entry: &Entry) -> Result<(), BuildError> {
        if self
            .config_file
            .as_ref()
            .is_some_and(|config| *config == normalize(&entry.path))
        {
            tracing::debug!(file = %entry.path.display(), "Skipping configuration file");
            return Ok(());
        }

        let source = child(relative, entry);
        let is_page = entry
            .path
            .extension()
            .is_some_and(|ext| ext == self.config.data_extension.as_str());

        let report = if is_page {
            let outcome = self.render_page(relative, entry, &source)?;
            FileReport::new(&source, FileKind::Page, outcome)
        } else {
            let outcome = self.copy_asset(relative, entry, &source)?;
            FileReport::new(&source, FileKind::Asset, outcome)
        };

        self.record(report);
        Ok(())
    }

    fn render_page(
        &self,
        relative: &Path,
        entry: &Entry,
        source: &Path,
    ) -> Result<Outcome, BuildError> {
        let page = match self.renderer.render(&entry.path, relative) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(file = %source.display(), error = %e, "Page not rendered");
                return Ok(Outcome::from_error(e));
            }
        };

        let output = self
            .config
            .output_dir
            .join(source.with_extension(&self.config.output_extension));
        self.ensure_output_dir(relative)?;

        Ok(match self.storage.write(&output, page.html.as_bytes()) {
            Ok(()) => {
                tracing::info!(file = %source.display(), template = %page.template, "Rendered page");
                Outcome::Rendered {
                    output,
                    template: page.template,
                    warnings: page.warnings,
                }
            }
            Err(e) => {
                tracing::warn!(file = %output.display(), error = %e, "Failed to write page");
                Outcome::Failed(FileError::Write {
                    path: output,
                    source: e,
                })
            }
        })
    }

    fn copy_asset(
        &self,
        relative: &Path,
        entry: &Entry,
        source: &Path,
    ) -> Result<Outcome, BuildError> {
        let output = self.config.output_dir.join(source);
        self.ensure_output_dir(relative)?;

        Ok(match self.storage.copy(&entry.path, &output) {
            Ok(()) => {
                tracing::info!(file = %source.display(), "Copied file");
                Outcome::Copied { output }
            }
            Err(e) => {
                tracing::warn!(file = %source.display(), error = %e, "Failed to copy file");
                Outcome::Failed(FileError::Copy {
                    path: output,
                    source: e,
                })
            }
        })
    }

    /// Create `<output>/<relative>` unless it already exists.
    fn ensure_output_dir(&self, relative: &Path) -> Result<(), BuildError> {
        let dir = self.config.output_dir.join(relative);
        if self.storage.is_dir(&dir) {
            return Ok(());
        }

        tracing::debug!(dir = %dir.display(), "Creating output directory");
        self.storage
            .create_dir_all(&dir)
            .map_err(|source| BuildError::CreateDir { path: dir, source })
    }

    fn record(&mut self, report: FileReport) {
        (self.observer)(BuildEvent::File(&report));
        self.report.files.push(report);
    }
}

/// Path of `entry` relative to the source root.
fn child(relative: &Path, entry: &Entry) -> PathBuf {
    match entry.path.file_name() {
        Some(name) => relative.join(name),
        None => relative.join(&entry.name),
    }
}

/// Absolute path with `.` components removed, for comparing roots.
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    absolute
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
