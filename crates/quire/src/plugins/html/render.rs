//! Page rendering into the shared HTML shell.

use quire_content::frontmatter;
use quire_core::{PreparedSite, Route, RouteKind};

use crate::plugins::markdown;
use crate::plugins::util::{escape_html, relative_href};

/// Renders routes of one prepared site.
pub(crate) struct PageRenderer<'a> {
    site: &'a PreparedSite,
    nav: Vec<&'a Route>,
}

impl<'a> PageRenderer<'a> {
    pub(crate) fn new(site: &'a PreparedSite) -> Self {
        let nav = site.routes.iter().filter(|r| r.show_in_sidebar).collect();
        Self { site, nav }
    }

    /// Full HTML document for `route`.
    pub(crate) fn render(&self, route: &Route) -> String {
        let layout = &self.site.layout;
        let site_title = &self.site.config.title;

        let title = if route.title == *site_title {
            escape_html(site_title)
        } else {
            format!("{} - {}", escape_html(&route.title), escape_html(site_title))
        };

        let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        html.push_str("<meta charset=\"utf-8\">\n");
        html.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
        );
        html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));

        if !layout.hide_header {
            html.push_str(&format!(
                "<header class=\"{}\">\n<a class=\"site-title\" href=\"{}\">{}</a>\n",
                classes("site-header", layout.header_class.as_deref()),
                relative_href(&route.path, "/"),
                escape_html(site_title),
            ));
            push_slots(&mut html, &layout.header);
            html.push_str("</header>\n");
        }

        html.push_str("<div class=\"site-main\">\n");
        if !layout.hide_sidebar {
            html.push_str(&format!(
                "<aside class=\"{}\">\n",
                classes("site-sidebar", layout.sidebar_class.as_deref())
            ));
            push_slots(&mut html, &layout.sidebar_top);
            html.push_str(&self.navigation(route));
            push_slots(&mut html, &layout.sidebar_bottom);
            html.push_str("</aside>\n");
        }
        html.push_str(&format!(
            "<main class=\"{}\">\n{}</main>\n</div>\n",
            classes("site-content", layout.content_class.as_deref()),
            self.body(route),
        ));

        if !layout.hide_footer {
            html.push_str(&format!(
                "<footer class=\"{}\">\n",
                classes("site-footer", layout.footer_class.as_deref())
            ));
            push_slots(&mut html, &layout.footer);
            html.push_str("</footer>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Page body: rendered markdown with decorations, or synthesized HTML.
    fn body(&self, route: &Route) -> String {
        match &route.kind {
            RouteKind::Content { file, decoration } => {
                let source = self.site.source(file).unwrap_or_default();
                decoration.wrap(&markdown::render(frontmatter::strip(source)))
            }
            RouteKind::Page { html, .. } => html.clone(),
        }
    }

    /// Sidebar list of every route shown in the sidebar.
    fn navigation(&self, current: &Route) -> String {
        let mut nav = String::from("<nav class=\"site-nav\">\n<ul>\n");
        for route in &self.nav {
            let active = if route.path == current.path {
                " class=\"active\""
            } else {
                ""
            };
            nav.push_str(&format!(
                "<li{active}><a href=\"{}\">{}</a></li>\n",
                relative_href(&current.path, &route.path),
                escape_html(&route.nav_label),
            ));
        }
        nav.push_str("</ul>\n</nav>\n");
        nav
    }
}

/// Base class plus any layout-contributed classes.
fn classes(base: &str, extra: Option<&str>) -> String {
    match extra {
        Some(extra) => format!("{base} {}", escape_html(extra)),
        None => base.to_owned(),
    }
}

fn push_slots(html: &mut String, slots: &[String]) {
    for slot in slots {
        html.push_str(slot);
        html.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use quire_core::{
        Decoration, ExtraPage, LayoutContribution, Plugin, SiteConfig, prepare_site,
    };
    use tempfile::TempDir;

    use super::*;

    fn site(dir: &TempDir, plugins: Vec<Plugin>) -> PreparedSite {
        let config = Arc::new(SiteConfig::new(dir.path(), Some("Handbook"), plugins));
        prepare_site(dir.path(), "html", &config).unwrap()
    }

    #[test]
    fn test_content_page() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("guide")).unwrap();
        fs::write(
            dir.path().join("guide/setup.md"),
            "---\ntitle: Setup & Install\nnavLabel: Setup\n---\nRun **it**.\n",
        )
        .unwrap();
        fs::write(dir.path().join("secret.md"), "---\nsidebar: false\n---\nHidden\n").unwrap();

        let site = site(&dir, Vec::new());
        let renderer = PageRenderer::new(&site);
        let html = renderer.render(site.route("/guide/setup").unwrap());

        assert!(html.contains("<title>Setup &amp; Install - Handbook</title>"));
        assert!(html.contains("<a class=\"site-title\" href=\"../../\">Handbook</a>"));
        assert!(html.contains("<li class=\"active\"><a href=\"./\">Setup</a></li>"));
        assert!(!html.contains("secret"));
        assert!(html.contains("<p>Run <strong>it</strong>.</p>"));
        assert!(!html.contains("navLabel"));
    }

    #[test]
    fn test_decoration_wraps_body() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.md"), "Body text\n").unwrap();
        let banner = Plugin::builder("banner")
            .with_decorate_page(|_| {
                Ok(Some(Decoration {
                    before_html: vec!["<div class=\"banner\"></div>".to_owned()],
                    after_html: vec!["<hr>".to_owned()],
                    replace_html: None,
                }))
            })
            .build()
            .unwrap();

        let site = site(&dir, vec![banner]);
        let html = PageRenderer::new(&site).render(&site.routes[0]);

        assert!(html.contains("<div class=\"banner\"></div><p>Body text</p>\n<hr>"));
    }

    #[test]
    fn test_layout_shapes_shell() {
        let dir = TempDir::new().unwrap();
        let layout = Plugin::builder("chrome")
            .with_extend_layout(|_| {
                Ok(Some(LayoutContribution {
                    hide_sidebar: Some(true),
                    content_class: Some("wide".to_owned()),
                    footer: vec!["<p>(c) Quire</p>".to_owned()],
                    ..Default::default()
                }))
            })
            .with_extend_pages(|_| Ok(Some(vec![ExtraPage::new("/about", "<p>About us</p>")])))
            .build()
            .unwrap();

        let site = site(&dir, vec![layout]);
        let html = PageRenderer::new(&site).render(site.route("/about").unwrap());

        assert!(!html.contains("site-sidebar"));
        assert!(html.contains("<main class=\"site-content wide\">\n<p>About us</p></main>"));
        assert!(html.contains("<footer class=\"site-footer\">\n<p>(c) Quire</p>\n</footer>"));
        assert!(html.contains("<title>About - Handbook</title>"));
    }
}
