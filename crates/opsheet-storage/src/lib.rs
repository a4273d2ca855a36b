//! Section document sources for opsheet.
//!
//! This crate provides a [`DocumentSource`] trait that resolves a section id to
//! the raw operation table for that section. The table is a [`toml::Table`];
//! `toml` is built with `preserve_order`, so records iterate in the order they
//! were written.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`DocumentSource`] trait with a single `load()` method
//! - [`FsSource`] reading `<dir>/<id>.toml` files
//! - [`MockSource`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use opsheet_storage::{DocumentSource, FsSource};
//!
//! let source = FsSource::new(PathBuf::from("docs/ops"));
//! let ops = source.load("maths")?;
//! for name in ops.keys() {
//!     println!("{name}");
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod source;

pub use fs::FsSource;
#[cfg(feature = "mock")]
pub use mock::MockSource;
pub use source::{DocumentSource, StorageError};
