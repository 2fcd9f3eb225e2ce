//! Template resolution and placeholder substitution for webjson.
//!
//! This crate turns one page descriptor plus one template into final HTML.
//! It performs no I/O of its own: includes are fetched through the
//! [`IncludeSource`] trait, so the same engine runs against the filesystem or
//! an in-memory map.
//!
//! # Placeholder syntax
//!
//! - `[@name@]` - replaced with the text of include `name`
//! - `[{key}]` - replaced with the page descriptor's `key` value
//! - `[{relative_path}]` - built-in, path from the page back to the site root
//!
//! Each syntax gets exactly one substitution pass. Text inserted by a pass is
//! never scanned again by that pass.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use wj_renderer::{Builtins, PageDescriptor, TemplateEngine};
//!
//! let page = PageDescriptor::parse(r#"{"template":"base","title":"Hello"}"#).unwrap();
//! let includes: HashMap<String, String> =
//!     HashMap::from([("nav".to_owned(), "<nav>[{title}]</nav>".to_owned())]);
//!
//! let result = TemplateEngine::new(&includes).render(
//!     "[@nav@]<p>[{title}]</p>",
//!     &page,
//!     &Builtins::for_page_dir(std::path::Path::new("")),
//! );
//!
//! assert_eq!(result.html, "<nav>Hello</nav><p>Hello</p>");
//! assert!(result.warnings.is_empty());
//! ```

mod descriptor;
mod engine;
mod replacements;
mod token;
mod util;

pub use descriptor::{DescriptorError, PageDescriptor, TEMPLATE_KEY};
pub use engine::{
    Builtins, IncludeError, IncludeSource, RELATIVE_PATH_KEY, RenderResult, RenderWarning,
    TemplateEngine,
};
pub use replacements::Replacements;
pub use token::{Token, TokenKind, Tokens, include_names};
pub use util::relative_path_to_root;
