//! Error types for plugin registration and site preparation.

use std::fmt;
use std::path::PathBuf;

use crate::registry::Capability;

/// Boxed error returned by plugin-authored setup, hook and command functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Extension point a plugin can implement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hook {
    /// Per-file source rewrite.
    TransformContent,
    /// Per-file HTML decoration.
    DecoratePage,
    /// Site-wide layout contribution.
    ExtendLayout,
    /// Site-wide synthesized pages.
    ExtendPages,
}

impl Hook {
    /// Hook name as shown in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::TransformContent => "transform-content",
            Self::DecoratePage => "decorate-page",
            Self::ExtendLayout => "extend-layout",
            Self::ExtendPages => "extend-pages",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error attributable to a plugin or to the plugin list as a whole.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Plugin declared without a name.
    #[error("Invalid plugin declaration: name cannot be empty")]
    EmptyName,
    /// Plugin declared with neither setup nor hooks.
    #[error("Invalid plugin `{plugin}`: it must provide a setup function or at least one hook")]
    NoCapabilities {
        /// Plugin name.
        plugin: String,
    },
    /// Two plugins share a name.
    #[error("Invalid plugin list: plugin `{plugin}` is registered more than once")]
    DuplicateName {
        /// Repeated plugin name.
        plugin: String,
    },
    /// Setup function failed.
    #[error("Plugin `{plugin}` failed during setup: {source}")]
    Setup {
        /// Plugin name.
        plugin: String,
        /// Underlying failure.
        #[source]
        source: BoxError,
    },
    /// Hook function failed.
    #[error("Plugin `{plugin}` failed in {hook} hook: {source}")]
    Hook {
        /// Plugin name.
        plugin: String,
        /// Hook that failed.
        hook: Hook,
        /// Underlying failure.
        #[source]
        source: BoxError,
    },
    /// Command capabilities missing after registration.
    #[error("{0}")]
    MissingCommands(MissingCommands),
}

/// Command capabilities that no plugin provided.
#[derive(Debug, PartialEq, Eq)]
pub struct MissingCommands {
    /// Missing capabilities, in contract order.
    pub missing: Vec<Capability>,
}

impl MissingCommands {
    /// True if a renderer-provided capability is missing.
    pub fn needs_renderer(&self) -> bool {
        self.missing
            .iter()
            .any(|c| matches!(c, Capability::Build | Capability::Dev))
    }
}

impl fmt::Display for MissingCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.missing.iter().map(|c| c.key()).collect();
        write!(f, "Missing required commands: {}", names.join(", "))?;
        if self.needs_renderer() {
            write!(
                f,
                ". The `build` and `dev` commands are typically provided by a renderer plugin; \
                 register one in the plugin list"
            )?;
        }
        Ok(())
    }
}

/// Error returned when site preparation fails.
#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    /// A plugin hook failed.
    #[error(transparent)]
    Plugin(#[from] PluginError),
    /// Two routes resolved to the same path.
    #[error("Route collision at `{path}`: {existing} and {incoming} both produce this path")]
    RouteCollision {
        /// Normalized colliding path.
        path: String,
        /// Origin of the route that claimed the path first.
        existing: String,
        /// Origin of the route that collided.
        incoming: String,
    },
    /// A synthesized page requested a path that escapes the site root.
    #[error("Plugin `{plugin}` requested invalid page path `{path}`: `..` segments are not allowed")]
    InvalidPagePath {
        /// Plugin that requested the page.
        plugin: String,
        /// Path as requested.
        path: String,
    },
    /// Content file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
