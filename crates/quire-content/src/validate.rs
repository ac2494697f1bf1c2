//! Content validation.
//!
//! Validation is a diagnostics oracle: problems are collected into a
//! [`ValidationReport`] rather than returned as errors. Only I/O failures
//! abort validation.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::{ContentError, enumerate, frontmatter};

/// Validation rule with a stable identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Opening `---` without a closing line.
    FrontmatterUnclosed,
    /// Fenced code block that is never closed.
    CodeFenceUnclosed,
    /// No content after the frontmatter block.
    EmptyDocument,
}

impl Rule {
    /// Stable rule identifier.
    pub fn id(self) -> &'static str {
        match self {
            Self::FrontmatterUnclosed => "frontmatter-unclosed",
            Self::CodeFenceUnclosed => "code-fence-unclosed",
            Self::EmptyDocument => "empty-document",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A single validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Rule that produced this diagnostic.
    pub rule: Rule,
    /// File path relative to the content root.
    pub file: String,
    /// 1-based line, if the problem has a location.
    pub line: Option<usize>,
    /// 1-based column, if the problem has a location.
    pub column: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// `file`, `file:line` or `file:line:column`.
    pub fn location(&self) -> String {
        match (self.line, self.column) {
            (Some(line), Some(column)) => format!("{}:{line}:{column}", self.file),
            (Some(line), None) => format!("{}:{line}", self.file),
            (None, _) => self.file.clone(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.location(), self.rule, self.message)
    }
}

/// Result of validating a content root.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Number of files inspected.
    pub files_checked: usize,
    /// Every diagnostic found, in file order.
    pub errors: Vec<Diagnostic>,
}

impl ValidationReport {
    /// True when no diagnostics were reported.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate every content file under `root`.
///
/// # Errors
///
/// Returns `ContentError::Io` if a content file cannot be read.
pub fn validate(root: &Path) -> Result<ValidationReport, ContentError> {
    let mut report = ValidationReport::default();
    for file in enumerate(root) {
        let path = root.join(&file);
        let source = fs::read_to_string(&path).map_err(|source| ContentError::Io { path, source })?;
        report.errors.extend(validate_source(&file, &source));
        report.files_checked += 1;
    }
    tracing::info!(
        files = report.files_checked,
        errors = report.errors.len(),
        "Validated content"
    );
    Ok(report)
}

/// Validate a single file's source.
pub fn validate_source(file: &str, source: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if frontmatter::is_unterminated(source) {
        diagnostics.push(Diagnostic {
            rule: Rule::FrontmatterUnclosed,
            file: file.to_owned(),
            line: Some(1),
            column: Some(1),
            message: "frontmatter block opened with `---` is never closed".to_owned(),
        });
    }

    let body = frontmatter::strip(source);
    let consumed = source.len() - body.len();
    let first_line = source[..consumed].matches('\n').count() + 1;

    if let Some((line, column, fence)) = unclosed_fence(body) {
        diagnostics.push(Diagnostic {
            rule: Rule::CodeFenceUnclosed,
            file: file.to_owned(),
            line: Some(first_line + line),
            column: Some(column),
            message: format!("code block opened with `{fence}` is never closed"),
        });
    }

    if diagnostics.is_empty() && body.trim().is_empty() {
        diagnostics.push(Diagnostic {
            rule: Rule::EmptyDocument,
            file: file.to_owned(),
            line: None,
            column: None,
            message: "document has no content".to_owned(),
        });
    }

    diagnostics
}

/// Find a fence that is still open at the end of `body`.
///
/// Returns the 0-based line offset, 1-based column and the fence marker.
fn unclosed_fence(body: &str) -> Option<(usize, usize, String)> {
    let mut open: Option<(usize, usize, char, usize)> = None;

    for (index, line) in body.lines().enumerate() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        if indent > 3 {
            continue;
        }
        let Some(marker) = trimmed.chars().next().filter(|c| *c == '`' || *c == '~') else {
            continue;
        };
        let run = trimmed.chars().take_while(|c| *c == marker).count();
        if run < 3 {
            continue;
        }

        match open {
            None => open = Some((index, indent + 1, marker, run)),
            Some((_, _, open_marker, open_run))
                if marker == open_marker
                    && run >= open_run
                    && trimmed[run..].trim().is_empty() =>
            {
                open = None;
            }
            Some(_) => {}
        }
    }

    open.map(|(line, column, marker, run)| (line, column, marker.to_string().repeat(run)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_valid_document() {
        let source = "---\ntitle: Ok\n---\n# Ok\n\n```rust\nfn main() {}\n```\n";
        assert!(validate_source("ok.md", source).is_empty());
    }

    #[test]
    fn test_unclosed_frontmatter() {
        let diagnostics = validate_source("bad.md", "---\ntitle: Oops\n# Heading\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, Rule::FrontmatterUnclosed);
        assert_eq!(diagnostics[0].line, Some(1));
    }

    #[test]
    fn test_unclosed_code_fence_reports_opening_line() {
        let source = "---\ntitle: Fence\n---\n# Title\n\n  ~~~~sh\nls\n~~~\n";
        let diagnostics = validate_source("fence.md", source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, Rule::CodeFenceUnclosed);
        assert_eq!(diagnostics[0].line, Some(6));
        assert_eq!(diagnostics[0].column, Some(3));
        assert!(diagnostics[0].message.contains("~~~~"));
    }

    #[test]
    fn test_backtick_fence_not_closed_by_tildes() {
        let diagnostics = validate_source("mixed.md", "```\ncode\n~~~\n");
        assert_eq!(diagnostics[0].rule, Rule::CodeFenceUnclosed);
        assert_eq!(diagnostics[0].line, Some(1));
    }

    #[test]
    fn test_empty_document() {
        let diagnostics = validate_source("empty.md", "---\ntitle: Nothing\n---\n\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].rule, Rule::EmptyDocument);
        assert_eq!(diagnostics[0].line, None);
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            rule: Rule::CodeFenceUnclosed,
            file: "guide/setup.md".to_owned(),
            line: Some(4),
            column: Some(1),
            message: "code block opened with ``` is never closed".to_owned(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "guide/setup.md:4:1 [code-fence-unclosed] code block opened with ``` is never closed"
        );
    }

    #[test]
    fn test_diagnostic_location() {
        let mut diagnostic = Diagnostic {
            rule: Rule::EmptyDocument,
            file: "empty.md".to_owned(),
            line: None,
            column: None,
            message: "document has no content".to_owned(),
        };
        assert_eq!(diagnostic.location(), "empty.md");
        diagnostic.line = Some(3);
        assert_eq!(diagnostic.location(), "empty.md:3");
        diagnostic.column = Some(2);
        assert_eq!(diagnostic.location(), "empty.md:3:2");
    }

    #[test]
    fn test_validate_root() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("good.md"), "# Good\n").unwrap();
        fs::write(root.join("bad.mdx"), "").unwrap();

        let report = validate(root).unwrap();
        assert_eq!(report.files_checked, 2);
        assert!(!report.is_ok());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].file, "bad.mdx");
        assert_eq!(report.errors[0].rule.id(), "empty-document");
    }
}
