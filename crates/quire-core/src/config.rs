//! Resolved site configuration.

use std::fmt;
use std::path::PathBuf;

use crate::plugin::Plugin;

/// Title used when the configuration leaves it blank.
pub const DEFAULT_TITLE: &str = "Documentation";

/// Configuration after plugin resolution.
///
/// Plugin order is fixed at construction and is the only source of ordering
/// for registration and hooks.
pub struct SiteConfig {
    /// Project root (absolute path).
    pub root: PathBuf,
    /// Directory scanned for content files. Defaults to `root`.
    pub content_dir: PathBuf,
    /// Site title, never blank.
    pub title: String,
    plugins: Vec<Plugin>,
}

impl SiteConfig {
    /// Create a configuration. Blank or missing titles become [`DEFAULT_TITLE`].
    pub fn new(root: impl Into<PathBuf>, title: Option<&str>, plugins: Vec<Plugin>) -> Self {
        let root = root.into();
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_owned();
        Self {
            content_dir: root.clone(),
            root,
            title,
            plugins,
        }
    }

    /// Set the content directory.
    #[must_use]
    pub fn with_content_dir(mut self, content_dir: impl Into<PathBuf>) -> Self {
        self.content_dir = content_dir.into();
        self
    }

    /// Plugins in declared order.
    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }
}

impl fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.plugins.iter().map(Plugin::name).collect();
        f.debug_struct("SiteConfig")
            .field("root", &self.root)
            .field("content_dir", &self.content_dir)
            .field("title", &self.title)
            .field("plugins", &names)
            .finish()
    }
}
