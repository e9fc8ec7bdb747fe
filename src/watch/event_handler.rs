// src/watch/event_handler.rs

//! Applying host-reported file changes to the candidate set between builds.

use std::collections::BTreeSet;
use std::path::PathBuf;

use tracing::debug;

use crate::engine::candidates::CandidateFiles;
use crate::fs::{FileKind, FileSystem, usable};

/// Files the host saw change since the previous build.
///
/// `None` means the host did not report that list at all (for example before
/// the first watch cycle), which is different from an empty list only in that
/// nothing is logged for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchEvent {
    pub added: Option<BTreeSet<PathBuf>>,
    pub modified: Option<BTreeSet<PathBuf>>,
    pub removed: Option<BTreeSet<PathBuf>>,
}

impl WatchEvent {
    pub fn with_added<I: IntoIterator<Item = P>, P: Into<PathBuf>>(mut self, paths: I) -> Self {
        self.added
            .get_or_insert_with(BTreeSet::new)
            .extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_modified<I: IntoIterator<Item = P>, P: Into<PathBuf>>(mut self, paths: I) -> Self {
        self.modified
            .get_or_insert_with(BTreeSet::new)
            .extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_removed<I: IntoIterator<Item = P>, P: Into<PathBuf>>(mut self, paths: I) -> Self {
        self.removed
            .get_or_insert_with(BTreeSet::new)
            .extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        [&self.added, &self.modified, &self.removed]
            .into_iter()
            .all(|list| list.as_ref().is_none_or(|set| set.is_empty()))
    }
}

/// Bring `files` up to date with one watch event.
///
/// Added and modified paths are inserted only if they currently stat as a
/// regular file; a path that vanished or turned into a directory since the
/// event is ignored. Removed paths are deleted without checking the disk.
/// Additions are applied first, so a path reported as both changed and
/// removed ends up removed.
pub fn apply_watch_event(files: &mut CandidateFiles, fs: Option<&dyn FileSystem>, event: &WatchEvent) {
    let Some(fs) = usable(fs) else {
        debug!("filesystem cannot be introspected; ignoring watch event");
        return;
    };

    let changed = event.added.iter().chain(event.modified.iter()).flatten();
    for path in changed {
        match fs.stat(path) {
            Ok(FileKind::File) => {
                if files.insert(path.clone()) {
                    debug!(path = ?path, "watch: new candidate file");
                }
            }
            Ok(kind) => debug!(path = ?path, ?kind, "watch: not a regular file; ignoring"),
            Err(_) => debug!(path = ?path, "watch: path vanished before stat; ignoring"),
        }
    }

    for path in event.removed.iter().flatten() {
        if files.remove(path) {
            debug!(path = ?path, "watch: candidate file removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::path::Path;

    #[test]
    fn added_file_is_inserted_and_removed_file_deleted() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/a.ts", "");
        let mut files: CandidateFiles = ["/p/b.ts", "/p/c.ts"].into_iter().collect();

        let event = WatchEvent::default()
            .with_added(["/p/a.ts"])
            .with_removed(["/p/b.ts"]);
        apply_watch_event(&mut files, Some(&fs), &event);

        assert_eq!(
            files.sorted(),
            vec![PathBuf::from("/p/a.ts"), PathBuf::from("/p/c.ts")]
        );
    }

    #[test]
    fn directories_and_vanished_paths_are_ignored() {
        let fs = MockFileSystem::new();
        fs.add_dir("/p/dir");
        let mut files = CandidateFiles::new();

        let event = WatchEvent::default().with_modified(["/p/dir", "/p/gone.ts"]);
        apply_watch_event(&mut files, Some(&fs), &event);

        assert!(files.is_empty());
    }

    #[test]
    fn changed_then_removed_ends_up_removed() {
        let fs = MockFileSystem::new();
        fs.add_file("/p/a.ts", "");
        let mut files = CandidateFiles::new();

        let event = WatchEvent::default()
            .with_modified(["/p/a.ts"])
            .with_removed(["/p/a.ts"]);
        apply_watch_event(&mut files, Some(&fs), &event);

        assert!(!files.contains(Path::new("/p/a.ts")));
    }

    #[test]
    fn missing_filesystem_leaves_set_untouched() {
        let mut files: CandidateFiles = ["/p/b.ts"].into_iter().collect();
        let event = WatchEvent::default().with_removed(["/p/b.ts"]);
        apply_watch_event(&mut files, None, &event);
        assert_eq!(files.len(), 1);
    }
}
