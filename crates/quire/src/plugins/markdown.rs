//! Markdown rendering with stable heading ids.
//!
//! Rendering and table-of-contents extraction share one id assignment, so a
//! TOC link always matches the `id` of the rendered heading.

use std::collections::{HashMap, HashSet};

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};

use super::util::{heading_level_to_num, slugify};

/// Heading found in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Heading {
    /// Level (1-6).
    pub level: u8,
    /// Plain text content.
    pub text: String,
    /// Unique fragment id.
    pub id: String,
}

/// Render markdown to HTML. Every heading gets an `id`.
pub(crate) fn render(markdown: &str) -> String {
    let (events, _) = annotate(markdown);
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, events.into_iter());
    output
}

/// Headings of a document in source order.
pub(crate) fn headings(markdown: &str) -> Vec<Heading> {
    annotate(markdown).1
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Generates unique heading ids, suffixing repeats with `-1`, `-2`, ...
///
/// A suffixed id never reuses an id already handed out, including one that
/// came straight from a heading's own text.
#[derive(Default)]
struct HeadingIds {
    suffixes: HashMap<String, usize>,
    used: HashSet<String>,
}

impl HeadingIds {
    fn generate(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let base = if slug.is_empty() {
            "section".to_owned()
        } else {
            slug
        };
        let mut id = base.clone();
        while self.used.contains(&id) {
            let suffix = self.suffixes.entry(base.clone()).or_insert(0);
            *suffix += 1;
            id = format!("{base}-{suffix}");
        }
        self.used.insert(id.clone());
        id
    }
}

/// Parse `markdown`, filling in heading ids and collecting headings.
fn annotate(markdown: &str) -> (Vec<Event<'_>>, Vec<Heading>) {
    let mut events = Vec::new();
    let mut headings = Vec::new();
    let mut ids = HeadingIds::default();
    // Index of the open heading's start event, its level and text so far.
    let mut open: Option<(usize, u8, String)> = None;

    for event in Parser::new_ext(markdown, parser_options()) {
        match &event {
            Event::Start(Tag::Heading { level, .. }) => {
                open = Some((events.len(), heading_level_to_num(*level), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, buffer)) = &mut open {
                    buffer.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((index, level, text)) = open.take() {
                    let id = ids.generate(&text);
                    if let Some(Event::Start(Tag::Heading { id: slot, .. })) = events.get_mut(index)
                    {
                        *slot = Some(CowStr::from(id.clone()));
                    }
                    headings.push(Heading {
                        level,
                        text: text.trim().to_owned(),
                        id,
                    });
                }
            }
            _ => {}
        }
        events.push(event);
    }

    (events, headings)
}
