//! Content file discovery by filesystem walking.

use std::fs;
use std::path::Path;

/// File extensions recognized as content.
pub const CONTENT_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Walk `root` and return every content file as a relative, forward-slash path.
///
/// Hidden files and directories (leading `.`) are skipped. The result is
/// sorted lexicographically. Returns an empty Vec if `root` doesn't exist.
pub fn enumerate(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if root.is_dir() {
        walk(root, "", &mut files);
    }
    files.sort();
    tracing::debug!(root = %root.display(), count = files.len(), "Enumerated content files");
    files
}

fn walk(dir: &Path, prefix: &str, files: &mut Vec<String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
            return;
        }
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };

        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            walk(&entry.path(), &rel, files);
        } else if is_content_file(&rel) {
            files.push(rel);
        }
    }
}

/// Check whether a path has a content extension (case-insensitive).
pub fn is_content_file(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| {
        CONTENT_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

/// Strip the content extension from a relative path.
///
/// Paths without a content extension are returned unchanged.
///
/// ```
/// use quire_content::strip_content_extension;
///
/// assert_eq!(strip_content_extension("guide/setup.mdx"), "guide/setup");
/// assert_eq!(strip_content_extension("notes.txt"), "notes.txt");
/// ```
pub fn strip_content_extension(path: &str) -> &str {
    if is_content_file(path)
        && let Some((stem, _)) = path.rsplit_once('.')
    {
        return stem;
    }
    path
}

fn extension_of(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    (!stem.is_empty()).then_some(ext)
}
