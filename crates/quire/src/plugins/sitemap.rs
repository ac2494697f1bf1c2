//! The `sitemap` plugin: a synthesized page listing every route.

use quire_core::{ExtraPage, Plugin, PluginError, Route};
use serde::Deserialize;

use super::util::{escape_html, relative_href};

/// Catalog name.
pub(crate) const NAME: &str = "sitemap";

/// Route of the synthesized page.
const SITEMAP_PATH: &str = "/sitemap";

/// `[plugins.options]` of the `sitemap` plugin.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SitemapOptions {
    /// Page title.
    pub title: String,
    /// List the sitemap itself in the sidebar.
    pub sidebar: bool,
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self {
            title: "Sitemap".to_owned(),
            sidebar: false,
        }
    }
}

pub(crate) fn plugin(options: SitemapOptions) -> Result<Plugin, PluginError> {
    Plugin::builder(NAME)
        .with_extend_pages(move |input| Ok(Some(vec![sitemap_page(&options, input.routes)])))
        .build()
}

fn sitemap_page(options: &SitemapOptions, routes: &[Route]) -> ExtraPage {
    let mut sorted: Vec<&Route> = routes.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut html = format!(
        "<h1>{}</h1>\n<ul class=\"sitemap\">\n",
        escape_html(&options.title)
    );
    for route in sorted {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a> <code>{}</code></li>\n",
            relative_href(SITEMAP_PATH, &route.path),
            escape_html(&route.title),
            escape_html(&route.path),
        ));
    }
    html.push_str("</ul>\n");

    let page = ExtraPage::new(SITEMAP_PATH, html).with_title(options.title.clone());
    if options.sidebar { page } else { page.hidden() }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use quire_core::{RouteKind, SiteConfig, prepare_site};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_sitemap_lists_routes() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("guide")).unwrap();
        fs::write(dir.path().join("index.md"), "Home\n").unwrap();
        fs::write(dir.path().join("guide/setup.md"), "---\ntitle: Setup <fast>\n---\nGo\n").unwrap();
        let config = Arc::new(SiteConfig::new(
            dir.path(),
            None,
            vec![plugin(SitemapOptions::default()).unwrap()],
        ));

        let site = prepare_site(dir.path(), "html", &config).unwrap();
        let page = site.route("/sitemap").unwrap();

        assert_eq!(page.title, "Sitemap");
        assert!(!page.show_in_sidebar);
        let RouteKind::Page { plugin, html } = &page.kind else {
            panic!("expected a synthesized page");
        };
        assert_eq!(plugin, "sitemap");
        assert_eq!(
            html,
            "<h1>Sitemap</h1>\n<ul class=\"sitemap\">\n\
             <li><a href=\"../\">Home</a> <code>/</code></li>\n\
             <li><a href=\"../guide/setup/\">Setup &lt;fast&gt;</a> <code>/guide/setup</code></li>\n\
             </ul>\n"
        );
    }

    #[test]
    fn test_sitemap_in_sidebar_with_custom_title() {
        let options = SitemapOptions {
            title: "All pages".to_owned(),
            sidebar: true,
        };
        let page = sitemap_page(&options, &[]);
        assert_eq!(page.path, "/sitemap");
        assert_eq!(page.title.as_deref(), Some("All pages"));
        assert_eq!(page.show_in_sidebar, None);
    }
}
