//! Directory provider abstraction for the webjson site generator.
//!
//! This crate provides a [`Storage`] trait covering the handful of filesystem
//! operations a site build needs: listing a directory, reading and writing
//! files, and creating directories. This enables:
//!
//! - **Unit testing** of the tree walker and page renderer without touching disk
//! - **Deterministic ordering** independent of the host's `read_dir` order
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `list()`, `read()`, `write()` and `create_dir_all()`
//! - [`FsStorage`] implementation backed by `std::fs`
//! - [`MockStorage`] in-memory implementation for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use wj_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new();
//! for entry in storage.list(Path::new("site"))? {
//!     println!("{} ({:?})", entry.name, entry.kind);
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};
