//! Layout contributions and their merge.
//!
//! Each extend-layout hook may return a [`LayoutContribution`]. They are
//! folded in plugin order into one [`Layout`]:
//! - hide flags: the last `Some` wins
//! - class names: fragments are space-joined per region; blank results are unset
//! - slots: fragments are appended per region

use serde::Serialize;

/// Partial layout returned by an extend-layout hook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutContribution {
    /// Hide the default header.
    pub hide_header: Option<bool>,
    /// Hide the default footer.
    pub hide_footer: Option<bool>,
    /// Hide the default sidebar.
    pub hide_sidebar: Option<bool>,
    /// Class names for the header region.
    pub header_class: Option<String>,
    /// Class names for the footer region.
    pub footer_class: Option<String>,
    /// Class names for the sidebar region.
    pub sidebar_class: Option<String>,
    /// Class names for the main content region.
    pub content_class: Option<String>,
    /// HTML fragments for the header slot.
    pub header: Vec<String>,
    /// HTML fragments for the footer slot.
    pub footer: Vec<String>,
    /// HTML fragments above the sidebar navigation.
    pub sidebar_top: Vec<String>,
    /// HTML fragments below the sidebar navigation.
    pub sidebar_bottom: Vec<String>,
}

/// Merged layout description consumed by renderers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    /// Hide the default header.
    pub hide_header: bool,
    /// Hide the default footer.
    pub hide_footer: bool,
    /// Hide the default sidebar.
    pub hide_sidebar: bool,
    /// Class names for the header region.
    pub header_class: Option<String>,
    /// Class names for the footer region.
    pub footer_class: Option<String>,
    /// Class names for the sidebar region.
    pub sidebar_class: Option<String>,
    /// Class names for the main content region.
    pub content_class: Option<String>,
    /// HTML fragments for the header slot.
    pub header: Vec<String>,
    /// HTML fragments for the footer slot.
    pub footer: Vec<String>,
    /// HTML fragments above the sidebar navigation.
    pub sidebar_top: Vec<String>,
    /// HTML fragments below the sidebar navigation.
    pub sidebar_bottom: Vec<String>,
}

/// In-progress fold of contributions.
#[derive(Default)]
pub(crate) struct LayoutMerger {
    layout: Layout,
    header_class: Vec<String>,
    footer_class: Vec<String>,
    sidebar_class: Vec<String>,
    content_class: Vec<String>,
}

impl LayoutMerger {
    pub(crate) fn apply(&mut self, contribution: LayoutContribution) {
        let layout = &mut self.layout;
        if let Some(hide) = contribution.hide_header {
            layout.hide_header = hide;
        }
        if let Some(hide) = contribution.hide_footer {
            layout.hide_footer = hide;
        }
        if let Some(hide) = contribution.hide_sidebar {
            layout.hide_sidebar = hide;
        }

        self.header_class.extend(contribution.header_class);
        self.footer_class.extend(contribution.footer_class);
        self.sidebar_class.extend(contribution.sidebar_class);
        self.content_class.extend(contribution.content_class);

        layout.header.extend(contribution.header);
        layout.footer.extend(contribution.footer);
        layout.sidebar_top.extend(contribution.sidebar_top);
        layout.sidebar_bottom.extend(contribution.sidebar_bottom);
    }

    pub(crate) fn finish(self) -> Layout {
        Layout {
            header_class: join_classes(&self.header_class),
            footer_class: join_classes(&self.footer_class),
            sidebar_class: join_classes(&self.sidebar_class),
            content_class: join_classes(&self.content_class),
            ..self.layout
        }
    }
}

fn join_classes(fragments: &[String]) -> Option<String> {
    let joined = fragments
        .iter()
        .flat_map(|f| f.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn merge(contributions: Vec<LayoutContribution>) -> Layout {
        let mut merger = LayoutMerger::default();
        for contribution in contributions {
            merger.apply(contribution);
        }
        merger.finish()
    }

    #[test]
    fn test_no_contributions_is_default() {
        assert_eq!(merge(Vec::new()), Layout::default());
    }

    #[test]
    fn test_hide_flags_last_set_value_wins() {
        let layout = merge(vec![
            LayoutContribution {
                hide_header: Some(true),
                hide_footer: Some(true),
                ..Default::default()
            },
            LayoutContribution {
                hide_header: Some(false),
                ..Default::default()
            },
            LayoutContribution::default(),
        ]);
        assert!(!layout.hide_header);
        assert!(layout.hide_footer);
        assert!(!layout.hide_sidebar);
    }

    #[test]
    fn test_classes_joined_and_trimmed() {
        let layout = merge(vec![
            LayoutContribution {
                header_class: Some("  sticky ".to_owned()),
                footer_class: Some("   ".to_owned()),
                ..Default::default()
            },
            LayoutContribution {
                header_class: Some("dark  wide".to_owned()),
                ..Default::default()
            },
        ]);
        assert_eq!(layout.header_class.as_deref(), Some("sticky dark wide"));
        assert_eq!(layout.footer_class, None);
        assert_eq!(layout.content_class, None);
    }

    #[test]
    fn test_slots_appended_in_order() {
        let layout = merge(vec![
            LayoutContribution {
                header: vec!["<a>".to_owned()],
                sidebar_bottom: vec!["<v1>".to_owned()],
                ..Default::default()
            },
            LayoutContribution {
                header: vec!["<b>".to_owned(), "<c>".to_owned()],
                sidebar_top: vec!["<search>".to_owned()],
                ..Default::default()
            },
        ]);
        assert_eq!(layout.header, vec!["<a>", "<b>", "<c>"]);
        assert_eq!(layout.sidebar_top, vec!["<search>"]);
        assert_eq!(layout.sidebar_bottom, vec!["<v1>"]);
        assert!(layout.footer.is_empty());
    }
}
