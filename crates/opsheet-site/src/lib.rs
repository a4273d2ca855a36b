//! Cheatsheet page building for opsheet.
//!
//! This crate provides:
//! - [`build_page`]: pulls the version and icon from their providers and
//!   renders the page
//! - [`MetadataProvider`]: version tag lookup ([`StaticMetadata`], [`GitDescribe`])
//! - [`IconProvider`]: favicon as a data URI ([`StaticIcon`], [`FileIcon`])
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use opsheet_sections::{SectionCatalog, SectionDescriptor};
//! use opsheet_site::{BuildConfig, FileIcon, GitDescribe, build_page};
//! use opsheet_storage::FsSource;
//!
//! let catalog = SectionCatalog::new(vec![SectionDescriptor::new("maths", "Math", "Maths")])?;
//! let source = FsSource::new(PathBuf::from("docs/ops"));
//! let metadata = GitDescribe::new(PathBuf::from("."));
//! let icon = FileIcon::new(PathBuf::from("docs/img/cheatsheet-favicon.png"));
//!
//! let html = build_page(&BuildConfig::default(), &catalog, &source, &metadata, &icon)?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod icon;
mod metadata;

pub use builder::{BuildConfig, BuildError, build_page, page_title};
pub use icon::{FileIcon, IconError, IconProvider, StaticIcon, encode_data_uri};
pub use metadata::{GitDescribe, MetadataError, MetadataProvider, StaticMetadata, VersionInfo};
