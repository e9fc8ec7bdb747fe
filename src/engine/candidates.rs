// src/engine/candidates.rs

//! The set of files known to exist under the scan root.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::{FileKind, FileSystem, usable};

/// Every source file seen on disk as of the last observation.
///
/// Only the scanner (additive) and the watch updater (additive and
/// subtractive) change it; reachability is judged on copies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFiles {
    files: HashSet<PathBuf>,
}

impl CandidateFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    /// Paths in a stable order.
    pub fn sorted(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.files.iter().cloned().collect();
        paths.sort();
        paths
    }

    /// Independent copy of the underlying set.
    pub fn snapshot(&self) -> HashSet<PathBuf> {
        self.files.clone()
    }

    pub(crate) fn insert(&mut self, path: PathBuf) -> bool {
        self.files.insert(path)
    }

    pub(crate) fn remove(&mut self, path: &Path) -> bool {
        self.files.remove(path)
    }

    /// Walk `root` and add every regular file below it.
    ///
    /// The scan is additive only: a path already in the set stays there even
    /// if it no longer exists. Removals are learnt exclusively from watch
    /// events, so outside of watch mode a file deleted after the first scan
    /// keeps being considered a candidate for the life of this set.
    ///
    /// Entries that are neither files nor directories, and paths that fail to
    /// stat, are skipped. Without a filesystem that supports synchronous
    /// introspection this does nothing.
    pub fn scan(&mut self, fs: Option<&dyn FileSystem>, root: &Path) {
        let Some(fs) = usable(fs) else {
            debug!(root = ?root, "filesystem cannot be introspected; skipping scan");
            return;
        };

        let before = self.files.len();
        let mut stack = vec![root.to_path_buf()];

        while let Some(path) = stack.pop() {
            match fs.stat(&path) {
                Ok(FileKind::Directory) => match fs.read_dir(&path) {
                    Ok(children) => stack.extend(children),
                    Err(err) => debug!(dir = ?path, error = %err, "cannot list directory"),
                },
                Ok(FileKind::File) => {
                    self.files.insert(path);
                }
                Ok(FileKind::Other) => {}
                Err(err) => debug!(path = ?path, error = %err, "cannot stat path"),
            }
        }

        debug!(
            root = ?root,
            added = self.files.len() - before,
            total = self.files.len(),
            "scan finished"
        );
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for CandidateFiles {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().map(Into::into).collect(),
        }
    }
}
