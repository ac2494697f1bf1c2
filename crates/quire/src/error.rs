//! CLI error types.

use std::path::PathBuf;

use quire_config::ConfigError;
use quire_core::{BoxError, PluginError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Plugin(#[from] PluginError),

    #[error("Unknown plugin `{name}` (known plugins: {known})")]
    UnknownPlugin { name: String, known: String },

    #[error("Invalid options for plugin `{plugin}`: {message}")]
    PluginOptions { plugin: String, message: String },

    #[error("{0}")]
    Command(BoxError),
}

/// Failure inside a built-in command.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CommandError {
    #[error("Runtime context has no site configuration")]
    MissingConfig,

    #[error("Validation failed with {0} error(s)")]
    ValidationFailed(usize),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to watch {}: {source}", .path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}
