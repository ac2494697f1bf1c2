//! Runtime context shared by all plugins.
//!
//! The context is a key/value map of tagged [`ContextValue`]s. It is seeded
//! with `root` and `config`, then each plugin's setup merges its
//! [`Contributions`] in plugin order. Same-named keys are overwritten, so the
//! last plugin to provide a key wins.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::error::{BoxError, PluginError};
use crate::plugin::Plugin;

/// Context key holding the project root.
pub const ROOT_KEY: &str = "root";
/// Context key holding the resolved configuration.
pub const CONFIG_KEY: &str = "config";
/// Context key a renderer plugin uses to announce its identifier.
pub const RENDERER_KEY: &str = "renderer";

/// Arguments passed through to a command.
#[derive(Clone, Debug, Default)]
pub struct CommandArgs {
    /// Output directory for commands that write files.
    pub out_dir: Option<PathBuf>,
    /// Print machine-readable JSON to stdout instead of text.
    pub json: bool,
}

type CommandFn = dyn Fn(&RuntimeContext, &CommandArgs) -> Result<(), BoxError> + Send + Sync;

/// A callable command capability.
#[derive(Clone)]
pub struct Command(Arc<CommandFn>);

impl Command {
    /// Wrap a function as a command.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RuntimeContext, &CommandArgs) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the command.
    ///
    /// # Errors
    ///
    /// Returns whatever the command implementation returns.
    pub fn call(&self, ctx: &RuntimeContext, args: &CommandArgs) -> Result<(), BoxError> {
        (self.0)(ctx, args)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Command(..)")
    }
}

/// A value stored in the runtime context.
#[derive(Clone, Debug)]
pub enum ContextValue {
    /// A filesystem path.
    Path(PathBuf),
    /// The resolved site configuration.
    Config(Arc<SiteConfig>),
    /// A callable command.
    Command(Command),
    /// Arbitrary plugin data.
    Data(serde_json::Value),
}

impl ContextValue {
    /// True for command values.
    pub fn is_command(&self) -> bool {
        matches!(self, Self::Command(_))
    }
}

/// Entries returned by a plugin's setup, applied in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Contributions {
    entries: Vec<(String, ContextValue)>,
}

impl Contributions {
    /// Create an empty contribution set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add any context value.
    #[must_use]
    pub fn insert(mut self, key: impl Into<String>, value: ContextValue) -> Self {
        self.entries.push((key.into(), value));
        self
    }

    /// Add a command.
    #[must_use]
    pub fn command<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&RuntimeContext, &CommandArgs) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.insert(key, ContextValue::Command(Command::new(f)))
    }

    /// Add plugin data.
    #[must_use]
    pub fn data(self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.insert(key, ContextValue::Data(value.into()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared runtime context built by plugin registration.
#[derive(Debug)]
pub struct RuntimeContext {
    entries: BTreeMap<String, ContextValue>,
}

impl RuntimeContext {
    /// Create a context seeded with `root` and `config`.
    pub fn seeded(config: &Arc<SiteConfig>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(ROOT_KEY.to_owned(), ContextValue::Path(config.root.clone()));
        entries.insert(
            CONFIG_KEY.to_owned(),
            ContextValue::Config(Arc::clone(config)),
        );
        Self { entries }
    }

    /// Run one plugin's setup against the current context and merge the result.
    ///
    /// Plugins without setup leave the context unchanged. On failure nothing
    /// from this plugin is merged; earlier entries stay in place.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Setup` naming the plugin if setup fails.
    pub fn register(&mut self, plugin: &Plugin) -> Result<(), PluginError> {
        let Some(setup) = plugin.setup_fn() else {
            tracing::debug!(plugin = plugin.name(), "Plugin has no setup, skipping");
            return Ok(());
        };

        let contributions = setup(self).map_err(|source| PluginError::Setup {
            plugin: plugin.name().to_owned(),
            source,
        })?;

        match contributions {
            Some(contributions) => {
                tracing::debug!(
                    plugin = plugin.name(),
                    entries = contributions.len(),
                    "Merging plugin contributions"
                );
                for (key, value) in contributions.entries {
                    if self.entries.insert(key.clone(), value).is_some() {
                        tracing::debug!(
                            plugin = plugin.name(),
                            key = key.as_str(),
                            "Overriding context entry"
                        );
                    }
                }
            }
            None => tracing::debug!(plugin = plugin.name(), "Setup contributed nothing"),
        }
        Ok(())
    }

    /// Get an entry.
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    /// True if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Get a command entry. Non-command values yield `None`.
    pub fn command(&self, key: &str) -> Option<&Command> {
        match self.entries.get(key)? {
            ContextValue::Command(command) => Some(command),
            _ => None,
        }
    }

    /// Get a data entry.
    pub fn data(&self, key: &str) -> Option<&serde_json::Value> {
        match self.entries.get(key)? {
            ContextValue::Data(value) => Some(value),
            _ => None,
        }
    }

    /// The project root, unless a plugin replaced it with a non-path value.
    pub fn root(&self) -> Option<&Path> {
        match self.entries.get(ROOT_KEY)? {
            ContextValue::Path(path) => Some(path),
            _ => None,
        }
    }

    /// The resolved configuration, unless a plugin replaced it.
    pub fn config(&self) -> Option<&Arc<SiteConfig>> {
        match self.entries.get(CONFIG_KEY)? {
            ContextValue::Config(config) => Some(config),
            _ => None,
        }
    }

    /// Renderer identifier announced by a renderer plugin, if any.
    pub fn renderer(&self) -> Option<&str> {
        self.data(RENDERER_KEY)?.as_str()
    }
}
