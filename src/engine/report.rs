// src/engine/report.rs

use std::path::{Path, PathBuf};

use crate::engine::differ::UnusedFiles;
use crate::host::BuildWarning;
use crate::watch::path_utils::{relative, to_slash};
use crate::watch::patterns::PatternSet;

pub const WARNING_ORIGIN: &str = "UnusedFilesPlugin";
pub const WARNING_HEADER: &str = "Found unused files:";

/// What one build found, after exclusion filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnusedReport {
    /// Root-relative paths, sorted.
    pub files: Vec<PathBuf>,
    /// How many unused files were dropped by `exclude` patterns.
    pub excluded: usize,
}

impl UnusedReport {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The batched warning for this report, if anything is left to report.
    pub fn to_warning(&self) -> Option<BuildWarning> {
        if self.files.is_empty() {
            return None;
        }

        let mut message = String::from(WARNING_HEADER);
        for file in &self.files {
            message.push_str("\n  - ");
            message.push_str(&to_slash(file));
        }

        Some(BuildWarning {
            origin: WARNING_ORIGIN.to_string(),
            message,
        })
    }
}

/// Drop excluded paths and make the rest relative to `root`.
pub fn build_report(unused: UnusedFiles, patterns: &PatternSet, root: &Path) -> UnusedReport {
    let mut report = UnusedReport::default();

    for path in unused {
        if patterns.is_excluded(&path) {
            report.excluded += 1;
            continue;
        }
        report.files.push(relative(root, &path));
    }

    report.files.sort();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::PluginOptions;
    use crate::engine::candidates::CandidateFiles;
    use crate::engine::differ::diff;
    use crate::host::BuiltModule;

    fn unused(paths: &[&str]) -> UnusedFiles {
        let candidates: CandidateFiles = paths.iter().copied().collect();
        diff(&candidates, &Vec::<BuiltModule>::new())
    }

    #[test]
    fn excluded_files_never_reach_the_warning() {
        let patterns = PatternSet::from_options(&PluginOptions::default(), Path::new("/p"));
        let report = build_report(
            unused(&["/p/src/dead.ts", "/p/src/note.md", "/p/src/api.d.ts"]),
            &patterns,
            Path::new("/p"),
        );

        assert_eq!(report.files, vec![PathBuf::from("src/dead.ts")]);
        assert_eq!(report.excluded, 2);

        let warning = report.to_warning().unwrap();
        assert_eq!(warning.message, "Found unused files:\n  - src/dead.ts");
        assert_eq!(warning.origin, WARNING_ORIGIN);
    }

    #[test]
    fn files_are_listed_in_one_sorted_warning() {
        let patterns = PatternSet::default();
        let report = build_report(
            unused(&["/p/b.ts", "/p/a/z.ts", "/other/c.ts"]),
            &patterns,
            Path::new("/p"),
        );

        let warning = report.to_warning().unwrap();
        assert_eq!(
            warning.message,
            "Found unused files:\n  - ../other/c.ts\n  - a/z.ts\n  - b.ts"
        );
    }

    #[test]
    fn nothing_left_means_no_warning() {
        let patterns = PatternSet::from_options(&PluginOptions::default(), Path::new("/p"));
        let report = build_report(unused(&["/p/README.md"]), &patterns, Path::new("/p"));
        assert!(report.is_empty());
        assert!(report.to_warning().is_none());
    }
}
