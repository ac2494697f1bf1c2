//! Shared helpers for HTML output.

use pulldown_cmark::HeadingLevel;

/// Escape HTML special characters.
pub(crate) fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Convert text to a URL-safe fragment id.
///
/// Lowercases ASCII alphanumerics, collapses whitespace, dashes and
/// underscores into single dashes, and drops everything else.
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }
    slug
}

/// Convert heading level enum to number (1-6).
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Relative link from the page at route `from` to the page at route `to`.
///
/// Pages are written as `<path>/index.html`, so every route is a directory
/// and links end with `/`.
pub(crate) fn relative_href(from: &str, to: &str) -> String {
    let from_segs: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_segs
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut href = "../".repeat(from_segs.len() - common);
    for seg in to_segs.iter().skip(common) {
        href.push_str(seg);
        href.push('/');
    }
    if href.is_empty() {
        "./".to_owned()
    } else {
        href
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("  Spaces  "), "spaces");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("-- trailing --"), "trailing");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_relative_href() {
        assert_eq!(relative_href("/", "/"), "./");
        assert_eq!(relative_href("/", "/guide"), "guide/");
        assert_eq!(relative_href("/guide", "/guide/setup"), "setup/");
        assert_eq!(relative_href("/guide/setup", "/"), "../../");
        assert_eq!(relative_href("/a/b", "/a/c"), "../c/");
        assert_eq!(relative_href("/a/b", "/a/b"), "./");
        assert_eq!(relative_href("/sitemap", "/guide/setup"), "../guide/setup/");
    }
}
