//! Shared path helpers.

use std::path::{Component, Path};

/// Compute the relative path from a page's directory back to the site root.
///
/// `page_dir` is the directory containing the page descriptor, relative to
/// the source root. The result always uses forward slashes and ends with a
/// slash, so templates can write `[{relative_path}]css/site.css`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use wj_renderer::relative_path_to_root;
///
/// assert_eq!(relative_path_to_root(Path::new("")), "./");
/// assert_eq!(relative_path_to_root(Path::new("blog")), "../");
/// assert_eq!(relative_path_to_root(Path::new("blog/2024")), "../../");
/// ```
pub fn relative_path_to_root(page_dir: &Path) -> String {
    let depth = page_dir
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count();

    if depth == 0 {
        "./".to_owned()
    } else {
        "../".repeat(depth)
    }
}
