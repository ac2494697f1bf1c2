//! The `toc` plugin: a table of contents above pages with several sections.

use quire_content::frontmatter;
use quire_core::{Decoration, Plugin, PluginError};
use serde::Deserialize;

use super::markdown;
use super::util::escape_html;

/// Catalog name.
pub(crate) const NAME: &str = "toc";

/// Pages with fewer `##` headings get no table of contents.
const MIN_SECTIONS: usize = 2;

/// `[plugins.options]` of the `toc` plugin.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TocOptions {
    /// Heading shown above the list.
    pub heading: String,
}

impl Default for TocOptions {
    fn default() -> Self {
        Self {
            heading: "On this page".to_owned(),
        }
    }
}

pub(crate) fn plugin(options: TocOptions) -> Result<Plugin, PluginError> {
    Plugin::builder(NAME)
        .with_decorate_page(move |input| Ok(table_of_contents(&options, input.source)))
        .build()
}

fn table_of_contents(options: &TocOptions, source: &str) -> Option<Decoration> {
    let sections: Vec<_> = markdown::headings(frontmatter::strip(source))
        .into_iter()
        .filter(|h| h.level == 2)
        .collect();
    if sections.len() < MIN_SECTIONS {
        return None;
    }

    let mut html = format!(
        "<nav class=\"toc\">\n<p class=\"toc-title\">{}</p>\n<ul>\n",
        escape_html(&options.heading)
    );
    for section in &sections {
        html.push_str(&format!(
            "<li><a href=\"#{}\">{}</a></li>\n",
            section.id,
            escape_html(&section.text)
        ));
    }
    html.push_str("</ul>\n</nav>");

    Some(Decoration {
        before_html: vec![html],
        ..Decoration::default()
    })
}
