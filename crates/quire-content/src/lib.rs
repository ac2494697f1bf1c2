//! Content discovery, frontmatter extraction and validation for Quire.
//!
//! These are the leaf collaborators of the site pipeline:
//!
//! - [`enumerate`]: walks a content root and returns sorted relative paths
//! - [`frontmatter::extract`]: turns a file's source into a [`Frontmatter`] map
//! - [`validate`]: checks every content file and reports [`Diagnostic`]s
//!
//! All paths handed out by this crate are relative to the content root and
//! use forward slashes regardless of platform.

mod enumerate;
pub mod frontmatter;
mod validate;

pub use enumerate::{CONTENT_EXTENSIONS, enumerate, is_content_file, strip_content_extension};
pub use frontmatter::Frontmatter;
pub use validate::{Diagnostic, Rule, ValidationReport, validate, validate_source};

use std::path::PathBuf;

/// Error returned when content cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// I/O error reading a content file.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
