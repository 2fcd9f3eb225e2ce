//! Page rendering: descriptor to HTML.

use std::path::Path;

use wj_renderer::{Builtins, PageDescriptor, RenderWarning, TemplateEngine};
use wj_storage::Storage;

use crate::error::FileError;
use crate::includes::StorageIncludes;
use crate::walker::BuildConfig;

/// A page rendered in memory, not yet written.
#[derive(Debug)]
pub(crate) struct RenderedPage {
    pub(crate) html: String,
    pub(crate) template: String,
    pub(crate) warnings: Vec<RenderWarning>,
}

/// Renders page descriptors using templates and includes from storage.
///
/// Templates and includes are read afresh for every page.
pub(crate) struct PageRenderer<'a> {
    storage: &'a dyn Storage,
    config: &'a BuildConfig,
}

impl<'a> PageRenderer<'a> {
    pub(crate) fn new(storage: &'a dyn Storage, config: &'a BuildConfig) -> Self {
        Self { storage, config }
    }

    /// Render the descriptor at `source`.
    ///
    /// `page_dir` is the descriptor's directory relative to the source root;
    /// it determines `[{relative_path}]`.
    pub(crate) fn render(&self, source: &Path, page_dir: &Path) -> Result<RenderedPage, FileError> {
        let json = self.storage.read(source).map_err(FileError::Read)?;
        let page = PageDescriptor::parse(&json)?;

        let name = page.template().ok_or(FileError::NoTemplate)?;
        let template = self.read_template(name)?;

        let includes = StorageIncludes::new(
            self.storage,
            &self.config.includes_dir,
            &self.config.output_extension,
        );
        let result = TemplateEngine::new(&includes).render(
            &template,
            &page,
            &Builtins::for_page_dir(page_dir),
        );

        Ok(RenderedPage {
            html: result.html,
            template: name.to_owned(),
            warnings: result.warnings,
        })
    }

    fn read_template(&self, name: &str) -> Result<String, FileError> {
        let path = self
            .config
            .templates_dir
            .join(format!("{name}.{}", self.config.output_extension));
        tracing::debug!(template = %name, path = %path.display(), "Reading template");

        self.storage.read(&path).map_err(|e| {
            if e.is_not_found() {
                FileError::TemplateNotFound(name.to_owned())
            } else {
                FileError::TemplateUnreadable {
                    name: name.to_owned(),
                    source: e,
                }
            }
        })
    }
}
