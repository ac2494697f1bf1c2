//! Site preparation pipeline.
//!
//! [`prepare_site`] turns a content root into a [`PreparedSite`] by running
//! the plugin hook passes in a fixed order:
//!
//! 1. enumerate content files and read them
//! 2. transform-content, per file, each hook in plugin order
//! 3. decorate-page, per file
//! 4. extend-layout, once per plugin
//! 5. extend-pages, once per plugin
//!
//! Any failure aborts the whole pipeline. Routes are sorted by path.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use quire_content::{Frontmatter, enumerate, frontmatter};

use crate::config::SiteConfig;
use crate::error::{BoxError, Hook, PluginError, PrepareError};
use crate::layout::{Layout, LayoutMerger};
use crate::plugin::{ContentInput, PageInput, Plugin, SiteInput};
use crate::route::{Decoration, Route, RouteKind, default_title, normalize_path, route_path};

/// A content file after every transform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentSource {
    /// Content file, relative to the content root.
    pub file: String,
    /// Route path of the file.
    pub path: String,
    /// Final source.
    pub source: String,
}

/// Output of [`prepare_site`].
#[derive(Debug)]
pub struct PreparedSite {
    /// Configuration the site was prepared with.
    pub config: Arc<SiteConfig>,
    /// Renderer identifier hooks were given.
    pub renderer: String,
    /// Merged layout.
    pub layout: Layout,
    /// Routes sorted by path.
    pub routes: Vec<Route>,
    /// Final sources in enumeration order.
    pub sources: Vec<ContentSource>,
}

impl PreparedSite {
    /// Find a route by normalized path.
    pub fn route(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.path == path)
    }

    /// Final source of a content file.
    pub fn source(&self, file: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|s| s.file == file)
            .map(|s| s.source.as_str())
    }
}

/// Per-file state carried between passes.
struct Draft {
    file: String,
    path: String,
    source: String,
    frontmatter: Frontmatter,
}

/// Prepare the site rooted at `root` for the renderer `renderer`.
///
/// # Errors
///
/// Returns `PrepareError::Io` if a content file can't be read,
/// `PrepareError::Plugin` if a hook fails, and
/// `PrepareError::RouteCollision` if two routes share a path.
pub fn prepare_site(
    root: &Path,
    renderer: &str,
    config: &Arc<SiteConfig>,
) -> Result<PreparedSite, PrepareError> {
    let plugins = config.plugins();

    let mut drafts = Vec::new();
    for file in enumerate(root) {
        let full_path = root.join(&file);
        let source = fs::read_to_string(&full_path).map_err(|source| PrepareError::Io {
            path: full_path,
            source,
        })?;
        drafts.push(Draft {
            path: route_path(&file),
            frontmatter: frontmatter::extract(&source),
            file,
            source,
        });
    }

    for draft in &mut drafts {
        transform_content(plugins, draft, renderer, root)?;
    }

    let mut taken: HashMap<String, String> = HashMap::new();
    let mut routes = Vec::with_capacity(drafts.len());
    for draft in &drafts {
        let route = content_route(plugins, draft, renderer, root)?;
        claim(&mut taken, &route.path, format!("content file `{}`", draft.file))?;
        routes.push(route);
    }

    let layout = extend_layout(plugins, &routes, renderer, root)?;
    extend_pages(plugins, &mut routes, &mut taken, renderer, root)?;

    routes.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::info!(
        root = %root.display(),
        renderer,
        files = drafts.len(),
        routes = routes.len(),
        "Prepared site"
    );

    let sources = drafts
        .into_iter()
        .map(|d| ContentSource {
            file: d.file,
            path: d.path,
            source: d.source,
        })
        .collect();

    Ok(PreparedSite {
        config: Arc::clone(config),
        renderer: renderer.to_owned(),
        layout,
        routes,
        sources,
    })
}

fn transform_content(
    plugins: &[Plugin],
    draft: &mut Draft,
    renderer: &str,
    root: &Path,
) -> Result<(), PluginError> {
    for plugin in plugins {
        let Some(hook) = &plugin.hooks().transform_content else {
            continue;
        };
        tracing::debug!(plugin = plugin.name(), file = draft.file.as_str(), "Transforming content");
        let input = ContentInput {
            file: &draft.file,
            frontmatter: &draft.frontmatter,
            path: &draft.path,
            renderer,
            root,
            source: &draft.source,
        };
        let source = hook(&input).map_err(hook_error(plugin, Hook::TransformContent))?;
        draft.frontmatter = frontmatter::extract(&source);
        draft.source = source;
    }
    Ok(())
}

fn content_route(
    plugins: &[Plugin],
    draft: &Draft,
    renderer: &str,
    root: &Path,
) -> Result<Route, PluginError> {
    let frontmatter = &draft.frontmatter;
    let title = frontmatter
        .text("title")
        .unwrap_or_else(|| default_title(&draft.file));
    let nav_label = frontmatter
        .text("navLabel")
        .unwrap_or_else(|| title.clone());
    let show_in_sidebar = !(frontmatter.is_falsy("sidebar") || frontmatter.is_falsy("showInSidebar"));

    let mut decoration = Decoration::default();
    for plugin in plugins {
        let Some(hook) = &plugin.hooks().decorate_page else {
            continue;
        };
        let input = PageInput {
            file: &draft.file,
            frontmatter,
            path: &draft.path,
            renderer,
            root,
            source: &draft.source,
            title: &title,
        };
        if let Some(contribution) = hook(&input).map_err(hook_error(plugin, Hook::DecoratePage))? {
            tracing::debug!(plugin = plugin.name(), file = draft.file.as_str(), "Decorating page");
            decoration.merge(contribution);
        }
    }

    Ok(Route {
        path: draft.path.clone(),
        kind: RouteKind::Content {
            file: draft.file.clone(),
            decoration,
        },
        frontmatter: frontmatter.clone(),
        title,
        nav_label,
        show_in_sidebar,
    })
}

fn extend_layout(
    plugins: &[Plugin],
    routes: &[Route],
    renderer: &str,
    root: &Path,
) -> Result<Layout, PluginError> {
    let input = SiteInput {
        renderer,
        root,
        routes,
    };
    let mut merger = LayoutMerger::default();
    for plugin in plugins {
        let Some(hook) = &plugin.hooks().extend_layout else {
            continue;
        };
        if let Some(contribution) = hook(&input).map_err(hook_error(plugin, Hook::ExtendLayout))? {
            tracing::debug!(plugin = plugin.name(), "Extending layout");
            merger.apply(contribution);
        }
    }
    Ok(merger.finish())
}

fn extend_pages(
    plugins: &[Plugin],
    routes: &mut Vec<Route>,
    taken: &mut HashMap<String, String>,
    renderer: &str,
    root: &Path,
) -> Result<(), PrepareError> {
    for plugin in plugins {
        let Some(hook) = &plugin.hooks().extend_pages else {
            continue;
        };
        let input = SiteInput {
            renderer,
            root,
            routes: routes.as_slice(),
        };
        let Some(pages) = hook(&input).map_err(hook_error(plugin, Hook::ExtendPages))? else {
            continue;
        };
        tracing::debug!(plugin = plugin.name(), pages = pages.len(), "Adding pages");
        for page in pages {
            let path =
                normalize_path(&page.path).ok_or_else(|| PrepareError::InvalidPagePath {
                    plugin: plugin.name().to_owned(),
                    path: page.path.clone(),
                })?;
            claim(taken, &path, format!("plugin `{}`", plugin.name()))?;
            routes.push(page.into_route(path, plugin.name()));
        }
    }
    Ok(())
}

/// Record `origin` as the owner of `path`, failing if it is already owned.
fn claim(
    taken: &mut HashMap<String, String>,
    path: &str,
    origin: String,
) -> Result<(), PrepareError> {
    if let Some(existing) = taken.get(path) {
        return Err(PrepareError::RouteCollision {
            path: path.to_owned(),
            existing: existing.clone(),
            incoming: origin,
        });
    }
    taken.insert(path.to_owned(), origin);
    Ok(())
}

fn hook_error(plugin: &Plugin, hook: Hook) -> impl FnOnce(BoxError) -> PluginError + '_ {
    move |source| PluginError::Hook {
        plugin: plugin.name().to_owned(),
        hook,
        source,
    }
}
