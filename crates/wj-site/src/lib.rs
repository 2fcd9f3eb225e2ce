//! Source tree walking and page rendering for webjson.
//!
//! This crate provides:
//! - [`SiteBuilder`]: walks the source tree, renders page descriptors and
//!   copies every other file into the output tree
//! - [`BuildReport`]: per-file outcomes of a build
//!
//! All I/O goes through a [`wj_storage::Storage`], so builds can run against
//! the real filesystem or an in-memory mock.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use wj_site::{BuildConfig, SiteBuilder};
//! use wj_storage::FsStorage;
//!
//! let config = BuildConfig::new("site", "public");
//! let builder = SiteBuilder::new(Arc::new(FsStorage::new()), config);
//! let report = builder.build()?;
//! println!("{} pages rendered", report.rendered());
//! # Ok(())
//! # }
//! ```

mod error;
mod includes;
mod page;
mod report;
mod walker;

pub use error::{BuildError, FileError};
pub use report::{BuildReport, FileKind, FileReport, Outcome};
pub use walker::{BuildConfig, BuildEvent, SiteBuilder};
