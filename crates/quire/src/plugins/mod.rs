//! Built-in plugin catalog.
//!
//! `quire.toml` names plugins; this module turns each [`PluginDecl`] into a
//! [`Plugin`] in declared order. Per-plugin `[plugins.options]` tables are
//! deserialized into the plugin's options struct.

pub(crate) mod base;
pub(crate) mod html;
mod markdown;
pub(crate) mod sitemap;
pub(crate) mod toc;
mod util;

use std::sync::Arc;

use quire_config::PluginDecl;
use quire_core::{Plugin, RuntimeContext, SiteConfig};
use serde::de::DeserializeOwned;

use crate::error::{CliError, CommandError};

/// Names accepted in `[[plugins]] name`, sorted.
pub(crate) const KNOWN_PLUGINS: &[&str] = &[base::NAME, html::NAME, sitemap::NAME, toc::NAME];

/// Resolve every declaration, keeping order.
pub(crate) fn resolve(decls: &[PluginDecl]) -> Result<Vec<Plugin>, CliError> {
    decls.iter().map(resolve_one).collect()
}

fn resolve_one(decl: &PluginDecl) -> Result<Plugin, CliError> {
    let name = decl.name.trim();
    tracing::debug!(plugin = name, "Resolving plugin");
    let plugin = match name {
        base::NAME => {
            no_options(decl)?;
            base::plugin()
        }
        html::NAME => {
            no_options(decl)?;
            html::plugin()
        }
        sitemap::NAME => sitemap::plugin(options(decl)?),
        toc::NAME => toc::plugin(options(decl)?),
        _ => {
            return Err(CliError::UnknownPlugin {
                name: name.to_owned(),
                known: KNOWN_PLUGINS.join(", "),
            });
        }
    };
    Ok(plugin?)
}

/// Deserialize a declaration's options table.
fn options<T: DeserializeOwned>(decl: &PluginDecl) -> Result<T, CliError> {
    toml::Value::Table(decl.options.clone())
        .try_into()
        .map_err(|e: toml::de::Error| CliError::PluginOptions {
            plugin: decl.name.trim().to_owned(),
            message: e.message().to_owned(),
        })
}

fn no_options(decl: &PluginDecl) -> Result<(), CliError> {
    match decl.options.keys().next() {
        None => Ok(()),
        Some(key) => Err(CliError::PluginOptions {
            plugin: decl.name.trim().to_owned(),
            message: format!("unknown option `{key}`, this plugin takes no options"),
        }),
    }
}

/// Configuration seeded into the runtime context.
pub(crate) fn site_config(ctx: &RuntimeContext) -> Result<&Arc<SiteConfig>, CommandError> {
    ctx.config().ok_or(CommandError::MissingConfig)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(toml: &str) -> PluginDecl {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_known_plugins_are_sorted() {
        let mut sorted = KNOWN_PLUGINS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, KNOWN_PLUGINS);
    }

    #[test]
    fn test_resolve_every_known_plugin() {
        for name in KNOWN_PLUGINS {
            let plugin = resolve_one(&decl(&format!("name = \"{name}\""))).unwrap();
            assert_eq!(plugin.name(), *name);
        }
    }

    #[test]
    fn test_resolve_trims_name() {
        let plugin = resolve_one(&decl("name = \"  toc \"")).unwrap();
        assert_eq!(plugin.name(), "toc");
    }

    #[test]
    fn test_unknown_plugin() {
        let err = resolve_one(&decl("name = \"search\"")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown plugin `search` (known plugins: core, html, sitemap, toc)"
        );
    }

    #[test]
    fn test_options_rejected_for_plain_plugins() {
        let err = resolve_one(&decl("name = \"core\"\n[options]\ntheme = \"dark\"\n")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("`core`"), "got: {message}");
        assert!(message.contains("`theme`"), "got: {message}");
    }

    #[test]
    fn test_invalid_option_type() {
        let err = resolve_one(&decl("name = \"toc\"\n[options]\nheading = 3\n")).unwrap_err();
        assert!(matches!(err, CliError::PluginOptions { ref plugin, .. } if plugin == "toc"));
    }
}
