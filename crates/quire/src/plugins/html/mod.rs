//! The `html` renderer plugin: `build` and `dev` commands.
//!
//! Pages are written as `<out_dir>/<route path>/index.html`, so `/` becomes
//! `index.html` and `/guide/setup` becomes `guide/setup/index.html`.

mod render;
mod watch;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use quire_core::{
    BoxError, Capability, CommandArgs, Contributions, Plugin, PluginError, RENDERER_KEY,
    RuntimeContext, SiteConfig, prepare_site,
};

use self::render::PageRenderer;
use super::{base, site_config};
use crate::error::CommandError;
use crate::output::Output;

/// Catalog name.
pub(crate) const NAME: &str = "html";

/// Renderer id announced in the runtime context.
pub(crate) const RENDERER_ID: &str = "html";

/// Output directory used when the command is given none.
const DEFAULT_OUT_DIR: &str = "dist";

/// Quiet period before a batch of edits triggers a rebuild.
const DEBOUNCE: Duration = Duration::from_millis(100);

pub(crate) fn plugin() -> Result<Plugin, PluginError> {
    Plugin::builder(NAME)
        .with_setup(|_| {
            Ok(Some(
                Contributions::new()
                    .data(RENDERER_KEY, RENDERER_ID)
                    .command(Capability::Build.key(), build)
                    .command(Capability::Dev.key(), dev),
            ))
        })
        .build()
}

fn build(ctx: &RuntimeContext, args: &CommandArgs) -> Result<(), BoxError> {
    let config = site_config(ctx)?;
    let out_dir = out_dir(config, args);
    let output = Output::new();

    output.info(&format!("Source: {}", config.content_dir.display()));
    output.info(&format!("Output: {}", out_dir.display()));

    let pages = build_site(config, &out_dir, &output)?;
    output.success(&format!(
        "Built {pages} pages to {}",
        out_dir.display()
    ));
    Ok(())
}

fn dev(ctx: &RuntimeContext, args: &CommandArgs) -> Result<(), BoxError> {
    let config = site_config(ctx)?;
    let out_dir = out_dir(config, args);
    let output = Output::new();

    match build_site(config, &out_dir, &output) {
        Ok(pages) => output.success(&format!("Built {pages} pages to {}", out_dir.display())),
        Err(e) => output.warning(&format!("Initial build failed: {e}")),
    }

    output.highlight(&format!(
        "Watching {} for changes (press Ctrl+C to stop)",
        config.content_dir.display()
    ));

    watch::watch(&config.content_dir, DEBOUNCE, |changes| {
        for change in changes {
            output.info(&format!("{:?}: {}", change.kind, change.path.display()));
        }
        match build_site(config, &out_dir, &output) {
            Ok(pages) => output.success(&format!("Rebuilt {pages} pages")),
            Err(e) => output.error(&format!("Rebuild failed: {e}")),
        }
    })?;
    Ok(())
}

fn out_dir(config: &SiteConfig, args: &CommandArgs) -> PathBuf {
    args.out_dir
        .clone()
        .unwrap_or_else(|| config.root.join(DEFAULT_OUT_DIR))
}

/// Validate, prepare and write every page. Returns the page count.
///
/// Nothing is written when validation fails.
pub(crate) fn build_site(
    config: &Arc<SiteConfig>,
    out_dir: &Path,
    output: &Output,
) -> Result<usize, BoxError> {
    base::check_content(&config.content_dir, output)?;
    let site = prepare_site(&config.content_dir, RENDERER_ID, config)?;

    let renderer = PageRenderer::new(&site);
    for route in &site.routes {
        let path = page_file(out_dir, &route.path);
        write_page(&path, &renderer.render(route))?;
        tracing::debug!(route = route.path.as_str(), file = %path.display(), "Wrote page");
    }

    tracing::info!(
        pages = site.routes.len(),
        out_dir = %out_dir.display(),
        "Built site"
    );
    Ok(site.routes.len())
}

/// Output file of a route.
fn page_file(out_dir: &Path, route_path: &str) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    for seg in route_path.split('/').filter(|s| !s.is_empty()) {
        path.push(seg);
    }
    path.push("index.html");
    path
}

fn write_page(path: &Path, html: &str) -> Result<(), CommandError> {
    let write_error = |source| CommandError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, html).map_err(write_error)
}
