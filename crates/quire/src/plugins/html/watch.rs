//! Content watching for the `dev` command.
//!
//! Editors often emit several events per save. Raw `notify` events are
//! recorded into a [`ChangeDebouncer`], which coalesces them per path and
//! releases each path once it has been quiet for the debounce window.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use quire_content::is_content_file;

use crate::error::CommandError;

/// How often the watch loop checks for settled changes.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Kind of content change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    fn from_notify(kind: notify::EventKind) -> Option<Self> {
        match kind {
            notify::EventKind::Create(_) => Some(Self::Created),
            notify::EventKind::Modify(_) => Some(Self::Modified),
            notify::EventKind::Remove(_) => Some(Self::Removed),
            _ => None,
        }
    }

    /// Combine a pending change with a newer one for the same path.
    ///
    /// `None` means the path appeared and vanished within one window.
    fn coalesce(self, newer: Self) -> Option<Self> {
        use ChangeKind::{Created, Modified, Removed};

        match (self, newer) {
            (Created, Removed) => None,
            (Created, _) | (Modified, Created) => Some(Created),
            (Modified, Modified) | (Removed, Created) => Some(Modified),
            (Modified | Removed, Removed) | (Removed, Modified) => Some(Removed),
        }
    }
}

/// A settled change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Change {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

struct Pending {
    kind: ChangeKind,
    deadline: Instant,
}

/// Per-path change coalescing with a quiet-period deadline.
pub(crate) struct ChangeDebouncer {
    pending: Mutex<HashMap<PathBuf, Pending>>,
    window: Duration,
}

impl ChangeDebouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// Record a change. Each record pushes the path's deadline back.
    pub(crate) fn record(&self, path: PathBuf, kind: ChangeKind) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let deadline = Instant::now() + self.window;

        match pending.entry(path) {
            Entry::Vacant(entry) => {
                entry.insert(Pending { kind, deadline });
            }
            Entry::Occupied(mut entry) => match entry.get().kind.coalesce(kind) {
                Some(kind) => {
                    *entry.get_mut() = Pending { kind, deadline };
                }
                None => {
                    entry.remove();
                }
            },
        }
    }

    /// Take every change whose deadline has passed, sorted by path.
    pub(crate) fn drain_ready(&self) -> Vec<Change> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        let mut ready: Vec<Change> = Vec::new();
        pending.retain(|path, change| {
            if change.deadline <= now {
                ready.push(Change {
                    path: path.clone(),
                    kind: change.kind,
                });
                false
            } else {
                true
            }
        });
        ready.sort_by(|a, b| a.path.cmp(&b.path));
        ready
    }
}

/// Watch `content_dir` and call `on_change` with each settled batch.
///
/// Only content files are reported. Runs until the process is interrupted.
pub(crate) fn watch(
    content_dir: &Path,
    window: Duration,
    mut on_change: impl FnMut(&[Change]),
) -> Result<(), CommandError> {
    let watch_error = |source| CommandError::Watch {
        path: content_dir.to_path_buf(),
        source,
    };

    let debouncer = Arc::new(ChangeDebouncer::new(window));
    let recorder = Arc::clone(&debouncer);
    let root = content_dir.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let Ok(event) = res else { return };
        let Some(kind) = ChangeKind::from_notify(event.kind) else {
            return;
        };
        for path in event.paths {
            if is_watched(&root, &path) {
                recorder.record(path, kind);
            }
        }
    })
    .map_err(watch_error)?;

    watcher
        .watch(content_dir, RecursiveMode::Recursive)
        .map_err(watch_error)?;
    tracing::info!(dir = %content_dir.display(), "Watching for changes");

    loop {
        thread::sleep(POLL_INTERVAL);
        let changes = debouncer.drain_ready();
        if !changes.is_empty() {
            on_change(&changes);
        }
    }
}

/// True for non-hidden content files under `root`.
fn is_watched(root: &Path, path: &Path) -> bool {
    let Ok(rel) = path.strip_prefix(root) else {
        return false;
    };
    let rel = rel.to_string_lossy();
    !rel.split(['/', '\\']).any(|seg| seg.starts_with('.')) && is_content_file(&rel)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(10);

    fn settle() {
        thread::sleep(Duration::from_millis(15));
    }

    #[test]
    fn test_change_emitted_after_window() {
        let debouncer = ChangeDebouncer::new(WINDOW);
        let path = PathBuf::from("/docs/guide.md");

        debouncer.record(path.clone(), ChangeKind::Modified);
        assert!(debouncer.drain_ready().is_empty());

        settle();
        assert_eq!(
            debouncer.drain_ready(),
            vec![Change {
                path,
                kind: ChangeKind::Modified
            }]
        );
        assert!(debouncer.drain_ready().is_empty());
    }

    #[test]
    fn test_repeated_saves_coalesce() {
        let debouncer = ChangeDebouncer::new(WINDOW);
        let path = PathBuf::from("/docs/guide.md");

        debouncer.record(path.clone(), ChangeKind::Created);
        debouncer.record(path.clone(), ChangeKind::Modified);
        debouncer.record(path, ChangeKind::Modified);
        settle();

        let changes = debouncer.drain_ready();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Created);
    }

    #[test]
    fn test_created_then_removed_is_dropped() {
        let debouncer = ChangeDebouncer::new(WINDOW);
        let path = PathBuf::from("/docs/tmp.md");

        debouncer.record(path.clone(), ChangeKind::Created);
        debouncer.record(path, ChangeKind::Removed);
        settle();

        assert!(debouncer.drain_ready().is_empty());
    }

    #[test]
    fn test_replaced_file_is_modified() {
        assert_eq!(
            ChangeKind::Removed.coalesce(ChangeKind::Created),
            Some(ChangeKind::Modified)
        );
        assert_eq!(
            ChangeKind::Modified.coalesce(ChangeKind::Removed),
            Some(ChangeKind::Removed)
        );
    }

    #[test]
    fn test_drain_is_sorted() {
        let debouncer = ChangeDebouncer::new(WINDOW);
        debouncer.record(PathBuf::from("/docs/b.md"), ChangeKind::Modified);
        debouncer.record(PathBuf::from("/docs/a.md"), ChangeKind::Modified);
        settle();

        let paths: Vec<_> = debouncer.drain_ready().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec![PathBuf::from("/docs/a.md"), PathBuf::from("/docs/b.md")]);
    }

    #[test]
    fn test_is_watched() {
        let root = Path::new("/docs");
        assert!(is_watched(root, Path::new("/docs/guide/setup.md")));
        assert!(is_watched(root, Path::new("/docs/index.MDX")));
        assert!(!is_watched(root, Path::new("/docs/dist/index.html")));
        assert!(!is_watched(root, Path::new("/docs/.git/notes.md")));
        assert!(!is_watched(root, Path::new("/elsewhere/a.md")));
    }
}
