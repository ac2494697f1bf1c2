//! Routes and path derivation.
//!
//! # Path Convention
//!
//! Route paths always start with `/` and never end with one, except the root
//! route `/` itself:
//! - `index.md` -> `/`
//! - `guide.md` -> `/guide`
//! - `guide/index.md` -> `/guide`
//! - `guide/setup.mdx` -> `/guide/setup`

use quire_content::{Frontmatter, strip_content_extension};
use serde::Serialize;

/// Title used for the root route when no title is declared.
const HOME_TITLE: &str = "Home";

/// One addressable page of the site.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    /// Normalized route path.
    pub path: String,
    /// Content-derived or plugin-synthesized.
    pub kind: RouteKind,
    /// Frontmatter of the final source (empty for synthesized pages).
    pub frontmatter: Frontmatter,
    /// Page title.
    pub title: String,
    /// Label used in navigation.
    pub nav_label: String,
    /// Whether the page is listed in the sidebar.
    pub show_in_sidebar: bool,
}

impl Route {
    /// Content file backing this route, if any.
    pub fn source_file(&self) -> Option<&str> {
        match &self.kind {
            RouteKind::Content { file, .. } => Some(file),
            RouteKind::Page { .. } => None,
        }
    }

    /// Decoration accumulated for a content route.
    pub fn decoration(&self) -> Option<&Decoration> {
        match &self.kind {
            RouteKind::Content { decoration, .. } => Some(decoration),
            RouteKind::Page { .. } => None,
        }
    }

    /// True for routes backed by a content file.
    pub fn is_content(&self) -> bool {
        matches!(self.kind, RouteKind::Content { .. })
    }
}

/// Where a route came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RouteKind {
    /// Derived from a content file.
    Content {
        /// Content file, relative to the content root.
        file: String,
        /// HTML fragments contributed by decorate-page hooks.
        decoration: Decoration,
    },
    /// Synthesized by an extend-pages hook.
    Page {
        /// Plugin that synthesized the page.
        plugin: String,
        /// Page HTML.
        html: String,
    },
}

/// HTML fragments placed around a content page.
///
/// Also the return value of a decorate-page hook.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    /// Fragments inserted before the page body, in plugin order.
    pub before_html: Vec<String>,
    /// Fragments inserted after the page body, in plugin order.
    pub after_html: Vec<String>,
    /// Replacement for the rendered body.
    pub replace_html: Option<String>,
}

impl Decoration {
    /// Fold a later contribution into this one.
    ///
    /// Before/after fragments are appended; a replacement overwrites any
    /// earlier one.
    pub fn merge(&mut self, later: Decoration) {
        self.before_html.extend(later.before_html);
        self.after_html.extend(later.after_html);
        if later.replace_html.is_some() {
            self.replace_html = later.replace_html;
        }
    }

    /// Surround `body_html` (or the replacement) with the fragments.
    pub fn wrap(&self, body_html: &str) -> String {
        let body = self.replace_html.as_deref().unwrap_or(body_html);
        let mut html = String::with_capacity(body.len());
        for fragment in &self.before_html {
            html.push_str(fragment);
        }
        html.push_str(body);
        for fragment in &self.after_html {
            html.push_str(fragment);
        }
        html
    }

    /// True if no fragment was contributed.
    pub fn is_empty(&self) -> bool {
        self.before_html.is_empty() && self.after_html.is_empty() && self.replace_html.is_none()
    }
}

/// A page synthesized by an extend-pages hook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtraPage {
    /// Requested path, normalized before use.
    pub path: String,
    /// Page title. Defaults to the humanized last path segment.
    pub title: Option<String>,
    /// Navigation label. Defaults to the title.
    pub nav_label: Option<String>,
    /// Page HTML.
    pub html: String,
    /// Sidebar visibility. Defaults to `true`.
    pub show_in_sidebar: Option<bool>,
}

impl ExtraPage {
    /// Create a page at `path` with `html`.
    pub fn new(path: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            html: html.into(),
            ..Self::default()
        }
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Hide from the sidebar.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.show_in_sidebar = Some(false);
        self
    }

    /// Convert into a route at the already-normalized `path`.
    pub(crate) fn into_route(self, path: String, plugin: &str) -> Route {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| title_for_path(&path));
        let nav_label = self
            .nav_label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| title.clone());
        Route {
            path,
            kind: RouteKind::Page {
                plugin: plugin.to_owned(),
                html: self.html,
            },
            frontmatter: Frontmatter::default(),
            title,
            nav_label,
            show_in_sidebar: self.show_in_sidebar.unwrap_or(true),
        }
    }
}

/// Derive the route path of a content file.
///
/// ```
/// use quire_core::route_path;
///
/// assert_eq!(route_path("index.mdx"), "/");
/// assert_eq!(route_path("guide/index.md"), "/guide");
/// assert_eq!(route_path("guide/setup.mdx"), "/guide/setup");
/// ```
pub fn route_path(file: &str) -> String {
    let stem = strip_content_extension(file).trim_matches('/');
    if stem.eq_ignore_ascii_case("index") {
        return "/".to_owned();
    }
    if let Some((parent, last)) = stem.rsplit_once('/')
        && last.eq_ignore_ascii_case("index")
    {
        return format!("/{parent}");
    }
    format!("/{stem}")
}

/// Normalize a requested path: leading slash, no trailing slash except `/`.
///
/// Empty and `.` segments are dropped. Returns `None` for paths with a `..`
/// segment.
///
/// ```
/// use quire_core::normalize_path;
///
/// assert_eq!(normalize_path("guide//setup/").as_deref(), Some("/guide/setup"));
/// assert_eq!(normalize_path("/./").as_deref(), Some("/"));
/// assert_eq!(normalize_path("/a/../b"), None);
/// ```
pub fn normalize_path(raw: &str) -> Option<String> {
    let mut segments = Vec::new();
    for seg in raw.trim().split('/') {
        match seg {
            "" | "." => {}
            ".." => return None,
            seg => segments.push(seg),
        }
    }
    Some(format!("/{}", segments.join("/")))
}

/// Default title of a content file when frontmatter declares none.
///
/// Index files are titled after their directory; the root index is `Home`.
pub fn default_title(file: &str) -> String {
    let stem = strip_content_extension(file).trim_matches('/');
    let (parent, base) = stem.rsplit_once('/').unwrap_or(("", stem));
    if base.eq_ignore_ascii_case("index") {
        let dir = parent.rsplit('/').next().unwrap_or(parent);
        return humanize_or(dir, HOME_TITLE);
    }
    humanize_or(base, base)
}

/// Default title of a synthesized page from its normalized path.
fn title_for_path(path: &str) -> String {
    let last = path.rsplit('/').next().unwrap_or(path);
    humanize_or(last, HOME_TITLE)
}

fn humanize_or(slug: &str, fallback: &str) -> String {
    let title = humanize(slug);
    if title.is_empty() {
        fallback.to_owned()
    } else {
        title
    }
}

/// Convert a slug to title case.
///
/// Splits on `-`, `_` and spaces, then capitalizes the first letter of each
/// word.
pub fn humanize(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}
