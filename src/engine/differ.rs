// src/engine/differ.rs

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::engine::candidates::CandidateFiles;
use crate::host::ModuleGraphView;

/// Candidate files that no module in the graph is backed by.
///
/// Computed fresh for every build and thrown away after reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnusedFiles {
    files: HashSet<PathBuf>,
}

impl UnusedFiles {
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
}

impl IntoIterator for UnusedFiles {
    type Item = PathBuf;
    type IntoIter = std::collections::hash_set::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// `candidates` minus every resource in `graph`, as a new set.
///
/// Virtual modules (no resource) and resources outside the candidate set are
/// ignored. `candidates` itself is left alone so it can carry over to the
/// next build.
pub fn diff(candidates: &CandidateFiles, graph: &dyn ModuleGraphView) -> UnusedFiles {
    let mut files = candidates.snapshot();

    for module in graph.modules() {
        if let Some(resource) = &module.resource {
            files.remove(resource);
        }
    }

    UnusedFiles { files }
}
