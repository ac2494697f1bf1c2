//! CLI command implementations.
//!
//! Every subcommand follows the same flow: load `quire.toml`, resolve the
//! declared plugins, register them, enforce the command contract, then call
//! the command the plugins provided.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use quire_config::{CliSettings, Config};
use quire_core::{
    Capability, CommandArgs, SiteConfig, enforce_command_contract, register_plugins,
};

use crate::error::CliError;
use crate::plugins;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover quire.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for commands that report on the site.
#[derive(Args)]
pub(crate) struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print results as JSON on stdout.
    #[arg(long)]
    json: bool,
}

/// Arguments for commands that write the site.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Output directory for rendered pages (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

impl CommonArgs {
    /// Load configuration and run `capability`.
    pub(crate) fn execute(
        self,
        capability: Capability,
        out_dir: Option<PathBuf>,
        json: bool,
    ) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            out_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        run(&config, capability, json)
    }
}

impl ReportArgs {
    /// Load configuration and run `capability`.
    pub(crate) fn execute(self, capability: Capability) -> Result<(), CliError> {
        self.common.execute(capability, None, self.json)
    }
}

impl BuildArgs {
    /// Load configuration and run `capability` with the output override.
    pub(crate) fn execute(self, capability: Capability) -> Result<(), CliError> {
        self.common.execute(capability, self.out_dir, false)
    }
}

/// Resolve plugins, check the contract and run one command.
pub(crate) fn run(config: &Config, capability: Capability, json: bool) -> Result<(), CliError> {
    let site = Arc::new(site_config(config)?);
    let ctx = register_plugins(&site)?;
    let commands = enforce_command_contract(&ctx)?;

    let args = CommandArgs {
        out_dir: Some(config.build_resolved.out_dir.clone()),
        json,
    };
    tracing::info!(command = capability.key(), "Running command");
    commands
        .get(capability)
        .call(&ctx, &args)
        .map_err(CliError::Command)
}

/// Build the core configuration from the loaded file.
pub(crate) fn site_config(config: &Config) -> Result<SiteConfig, CliError> {
    let plugins = plugins::resolve(&config.plugins)?;
    Ok(SiteConfig::new(
        config.docs_resolved.project_dir.clone(),
        config.site.title.as_deref(),
        plugins,
    )
    .with_content_dir(config.docs_resolved.source_dir.clone()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn config(dir: &TempDir, toml: &str) -> Config {
        Config::from_toml_str(toml, dir.path()).unwrap()
    }

    #[test]
    fn test_site_config_keeps_plugin_order() {
        let dir = TempDir::new().unwrap();
        let config = config(
            &dir,
            r#"
[site]
title = "Handbook"

[[plugins]]
name = "toc"

[[plugins]]
name = "core"

[[plugins]]
name = "html"
"#,
        );

        let site = site_config(&config).unwrap();

        let names: Vec<_> = site.plugins().iter().map(quire_core::Plugin::name).collect();
        assert_eq!(names, vec!["toc", "core", "html"]);
        assert_eq!(site.title, "Handbook");
        assert_eq!(site.root, dir.path());
        assert_eq!(site.content_dir, dir.path().join("docs"));
    }

    #[test]
    fn test_missing_renderer_is_reported() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, "[[plugins]]\nname = \"core\"\n");

        let message = run(&config, Capability::List, false).unwrap_err().to_string();

        assert!(message.contains("build, dev"), "got: {message}");
        assert!(message.contains("renderer plugin"), "got: {message}");
    }

    #[test]
    fn test_unknown_plugin_lists_known_names() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, "[[plugins]]\nname = \"pdf\"\n");

        let message = site_config(&config).unwrap_err().to_string();

        assert!(message.contains("`pdf`"), "got: {message}");
        assert!(message.contains("core, html, sitemap, toc"), "got: {message}");
    }

    #[test]
    fn test_build_writes_pages() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(docs.join("guide")).unwrap();
        fs::write(docs.join("index.md"), "---\ntitle: Welcome\n---\n# Hi\n").unwrap();
        fs::write(docs.join("guide/setup.md"), "Install it.\n").unwrap();
        let config = config(
            &dir,
            "[[plugins]]\nname = \"core\"\n\n[[plugins]]\nname = \"html\"\n",
        );

        run(&config, Capability::Build, false).unwrap();

        let index = fs::read_to_string(dir.path().join("dist/index.html")).unwrap();
        assert!(index.contains("<title>Welcome - Documentation</title>"));
        let setup = fs::read_to_string(dir.path().join("dist/guide/setup/index.html")).unwrap();
        assert!(setup.contains("<p>Install it.</p>"));
    }

    #[test]
    fn test_build_stops_on_invalid_content() {
        let dir = TempDir::new().unwrap();
        let docs = dir.path().join("docs");
        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("broken.md"), "```rust\nfn main() {}\n").unwrap();
        let config = config(
            &dir,
            "[[plugins]]\nname = \"core\"\n\n[[plugins]]\nname = \"html\"\n",
        );

        let message = run(&config, Capability::Build, false).unwrap_err().to_string();

        assert!(message.contains("Validation failed"), "got: {message}");
        assert!(!dir.path().join("dist").exists());
    }
}
