//! Template rendering: include expansion followed by property substitution.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::descriptor::PageDescriptor;
use crate::replacements::Replacements;
use crate::token::{TokenKind, Tokens, include_names};
use crate::util::relative_path_to_root;

/// Built-in property holding the path from the page back to the site root.
pub const RELATIVE_PATH_KEY: &str = "relative_path";

/// Error type returned by [`IncludeSource`] implementations.
pub type IncludeError = Box<dyn std::error::Error + Send + Sync>;

/// Source of include text, looked up by name.
///
/// Implemented by the site builder over its storage backend, and by
/// `HashMap<String, String>` for tests and embedding.
pub trait IncludeSource {
    /// Fetch the text of include `name`.
    ///
    /// Returns `Ok(None)` if no include by that name exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the include exists but can't be read.
    fn include(&self, name: &str) -> Result<Option<String>, IncludeError>;
}

impl IncludeSource for HashMap<String, String> {
    fn include(&self, name: &str) -> Result<Option<String>, IncludeError> {
        Ok(self.get(name).cloned())
    }
}

/// Values computed by the renderer rather than supplied by the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Builtins {
    /// Path from the page's directory back to the site root (e.g. `../`).
    pub relative_path: String,
}

impl Builtins {
    /// Built-ins for a page whose descriptor lives in `page_dir`, relative to
    /// the source root.
    #[must_use]
    pub fn for_page_dir(page_dir: &Path) -> Self {
        Self {
            relative_path: relative_path_to_root(page_dir),
        }
    }

    /// Register built-in values. Must run after user properties so built-ins
    /// take precedence over same-named page properties.
    fn register(&self, replacements: &mut Replacements) {
        replacements.add(RELATIVE_PATH_KEY, self.relative_path.as_str());
    }
}

/// Non-fatal problem found while rendering a page.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderWarning {
    /// Template references an include that doesn't exist; its tokens stay literal.
    IncludeNotFound {
        /// Include name.
        name: String,
    },
    /// Include exists but couldn't be read; its tokens stay literal.
    IncludeUnreadable {
        /// Include name.
        name: String,
        /// Underlying error message.
        message: String,
    },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncludeNotFound { name } => write!(f, "Include not found: {name}"),
            Self::IncludeUnreadable { name, message } => {
                write!(f, "Failed to read include {name}: {message}")
            }
        }
    }
}

/// Result of rendering one page.
#[derive(Debug)]
pub struct RenderResult {
    /// Final HTML.
    pub html: String,
    /// Distinct include names referenced by the template, in first-appearance order.
    pub includes: Vec<String>,
    /// Problems that didn't prevent rendering.
    pub warnings: Vec<RenderWarning>,
}

/// Renders templates against page descriptors.
///
/// Rendering is two independent passes over the text:
///
/// 1. Every distinct `[@name@]` in the template is looked up once through the
///    [`IncludeSource`]. Found includes replace all of their tokens verbatim;
///    missing ones leave their tokens in place and produce a warning.
/// 2. Every `[{key}]` in the include-expanded text is replaced with the page's
///    `key` property. Built-ins are registered last, so `[{relative_path}]`
///    always resolves to the computed path. Tokens with no value stay literal.
///
/// Neither pass scans text it inserted.
pub struct TemplateEngine<'a, S: IncludeSource + ?Sized> {
    includes: &'a S,
}

impl<'a, S: IncludeSource + ?Sized> TemplateEngine<'a, S> {
    /// Create an engine resolving includes from `includes`.
    #[must_use]
    pub fn new(includes: &'a S) -> Self {
        Self { includes }
    }

    /// Render `template` for `page`.
    #[must_use]
    pub fn render(
        &self,
        template: &str,
        page: &PageDescriptor,
        builtins: &Builtins,
    ) -> RenderResult {
        let mut warnings = Vec::new();
        let mut html = template.to_owned();

        let names = include_names(template);
        let mut includes = Replacements::new(TokenKind::Include);
        for name in &names {
            tracing::debug!(include = %name, "Found reference to include");
            match self.includes.include(name) {
                Ok(Some(text)) => includes.add(*name, text),
                Ok(None) => {
                    tracing::warn!(include = %name, "Include not found");
                    warnings.push(RenderWarning::IncludeNotFound {
                        name: (*name).to_owned(),
                    });
                }
                Err(e) => {
                    tracing::warn!(include = %name, error = %e, "Failed to read include");
                    warnings.push(RenderWarning::IncludeUnreadable {
                        name: (*name).to_owned(),
                        message: e.to_string(),
                    });
                }
            }
        }
        includes.apply(&mut html);

        let mut properties = Replacements::new(TokenKind::Property);
        for (key, value) in page.properties() {
            properties.add(key, value);
        }
        builtins.register(&mut properties);
        properties.apply(&mut html);

        let unresolved = Tokens::new(&html, TokenKind::Property).count();
        if unresolved > 0 {
            tracing::debug!(count = unresolved, "Property tokens left unresolved");
        }

        RenderResult {
            html,
            includes: names.into_iter().map(str::to_owned).collect(),
            warnings,
        }
    }
}
