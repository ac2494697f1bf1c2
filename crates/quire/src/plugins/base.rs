//! The `core` plugin: `list` and `validate` commands.

use std::path::Path;

use quire_content::ValidationReport;
use quire_core::{
    BoxError, Capability, CommandArgs, Contributions, Layout, Plugin, PluginError, PreparedSite,
    Route, RouteKind, RuntimeContext, prepare_site,
};
use serde::Serialize;

use super::site_config;
use crate::error::CommandError;
use crate::output::Output;

/// Catalog name.
pub(crate) const NAME: &str = "core";

/// Renderer id used by `list` when no renderer plugin announced one.
const NO_RENDERER: &str = "none";

pub(crate) fn plugin() -> Result<Plugin, PluginError> {
    Plugin::builder(NAME)
        .with_setup(|_| {
            Ok(Some(
                Contributions::new()
                    .command(Capability::List.key(), list)
                    .command(Capability::Validate.key(), validate),
            ))
        })
        .build()
}

/// JSON shape printed by `list --json`.
#[derive(Serialize)]
struct Listing<'a> {
    renderer: &'a str,
    layout: &'a Layout,
    routes: &'a [Route],
}

impl<'a> From<&'a PreparedSite> for Listing<'a> {
    fn from(site: &'a PreparedSite) -> Self {
        Self {
            renderer: &site.renderer,
            layout: &site.layout,
            routes: &site.routes,
        }
    }
}

fn list(ctx: &RuntimeContext, args: &CommandArgs) -> Result<(), BoxError> {
    let config = site_config(ctx)?;
    let renderer = ctx.renderer().unwrap_or(NO_RENDERER);
    let site = prepare_site(&config.content_dir, renderer, config)?;

    let output = Output::stdout();
    if args.json {
        output.json(&Listing::from(&site))?;
        return Ok(());
    }
    for route in &site.routes {
        output.info(&format_route(route));
    }
    Ok(())
}

fn validate(ctx: &RuntimeContext, args: &CommandArgs) -> Result<(), BoxError> {
    let config = site_config(ctx)?;
    if !args.json {
        check_content(&config.content_dir, &Output::new())?;
        return Ok(());
    }

    let report = quire_content::validate(&config.content_dir)?;
    Output::stdout().json(&report)?;
    ensure_valid(&report)
}

/// Validate every content file under `content_dir`, printing diagnostics.
///
/// Returns the number of files checked.
pub(crate) fn check_content(content_dir: &Path, output: &Output) -> Result<usize, BoxError> {
    let report = quire_content::validate(content_dir)?;
    for diagnostic in &report.errors {
        output.diagnostic(diagnostic);
    }
    ensure_valid(&report)?;
    output.success(&format!("Validated {} files", report.files_checked));
    Ok(report.files_checked)
}

fn ensure_valid(report: &ValidationReport) -> Result<(), BoxError> {
    if report.is_ok() {
        Ok(())
    } else {
        Err(CommandError::ValidationFailed(report.errors.len()).into())
    }
}

/// One tab-separated line per route: path, title, origin, sidebar flag.
fn format_route(route: &Route) -> String {
    let origin = match &route.kind {
        RouteKind::Content { file, .. } => file.clone(),
        RouteKind::Page { plugin, .. } => format!("plugin:{plugin}"),
    };
    let sidebar = if route.show_in_sidebar {
        "sidebar"
    } else {
        "hidden"
    };
    format!("{}\t{}\t{origin}\t{sidebar}", route.path, route.title)
}
