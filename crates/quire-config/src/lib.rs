//! Configuration management for Quire.
//!
//! Parses `quire.toml` with serde and provides auto-discovery of the config
//! file in parent directories. CLI settings can be applied during load via
//! [`CliSettings`].
//!
//! ## Plugin Declarations
//!
//! Plugins are declared as an array of tables. Declaration order is the
//! registration order and the hook order, so it is kept exactly as written:
//!
//! ```toml
//! [[plugins]]
//! name = "core"
//!
//! [[plugins]]
//! name = "html"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `site.title`, `docs.source_dir` and `build.out_dir` support `${VAR}` and
//! `${VAR:-default}`.

mod expand;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content source directory.
    pub source_dir: Option<PathBuf>,
    /// Override build output directory.
    pub out_dir: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quire.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site-level settings.
    pub site: SiteSettings,
    /// Plugin declarations in registration order.
    pub plugins: Vec<PluginDecl>,
    docs: DocsConfigRaw,
    build: BuildConfigRaw,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site-level settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Site title. Blank or absent titles are defaulted downstream.
    pub title: Option<String>,
}

/// A `[[plugins]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PluginDecl {
    /// Plugin name, resolved against the plugin catalog.
    #[serde(default)]
    pub name: String,
    /// Free-form options handed to the plugin factory.
    #[serde(default)]
    pub options: toml::Table,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    out_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Project root (directory of the config file, or the cwd).
    pub project_dir: PathBuf,
    /// Content root scanned for `.md`/`.mdx` files.
    pub source_dir: PathBuf,
}

/// Resolved build configuration.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory that rendered pages are written to.
    pub out_dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.title`").
        field: String,
        /// Error message (e.g., "${`DOCS_TITLE`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `quire.toml` in the current directory and its parents, falling back
    /// to defaults rooted at the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration from TOML text, resolving paths against `base`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` on the first invalid plugin entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, plugin) in self.plugins.iter().enumerate() {
            let name = plugin.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "plugins[{index}].name cannot be empty"
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Validation(format!(
                    "plugins[{index}].name `{name}` is declared more than once"
                )));
            }
        }
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.build_resolved.out_dir.clone_from(out_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteSettings::default(),
            plugins: Vec::new(),
            docs: DocsConfigRaw::default(),
            build: BuildConfigRaw::default(),
            docs_resolved: DocsConfig {
                project_dir: base.to_path_buf(),
                source_dir: base.join("docs"),
            },
            build_resolved: BuildConfig {
                out_dir: base.join("dist"),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref title) = self.site.title {
            self.site.title = Some(expand::expand_env(title, "site.title")?);
        }
        if let Some(ref dir) = self.docs.source_dir {
            self.docs.source_dir = Some(expand::expand_env(dir, "docs.source_dir")?);
        }
        if let Some(ref dir) = self.build.out_dir {
            self.build.out_dir = Some(expand::expand_env(dir, "build.out_dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.docs_resolved = DocsConfig {
            project_dir: config_dir.to_path_buf(),
            source_dir: resolve(self.docs.source_dir.as_deref(), "docs"),
        };
        self.build_resolved = BuildConfig {
            out_dir: resolve(self.build.out_dir.as_deref(), "dist"),
        };
    }
}
