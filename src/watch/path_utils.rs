// src/watch/path_utils.rs

//! Lexical path helpers shared by the pattern compiler and the reporter.
//!
//! Nothing here touches the filesystem: paths reported by the host are taken
//! at face value, so two spellings of the same file only compare equal after
//! [`normalize`].

use std::path::{Component, Path, PathBuf};

/// Fold `.` and `..` components without resolving symlinks.
///
/// `..` above the root is dropped, matching how absolute paths behave.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = match out.components().next_back() {
                    Some(Component::Normal(_)) => out.pop(),
                    _ => false,
                };
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolve `path` against `base`: absolute paths win, relative ones are
/// joined, and the result is normalized.
pub fn resolve(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    normalize(&base.join(path))
}

/// Path of `path` relative to `root`, climbing with `..` when `path` lives
/// outside of `root`. Both are expected to be absolute.
pub fn relative(root: &Path, path: &Path) -> PathBuf {
    // Fast path: the usual case of a file below the root.
    if let Ok(rel) = path.strip_prefix(root) {
        return rel.to_path_buf();
    }

    let root: Vec<_> = root.components().collect();
    let target: Vec<_> = path.components().collect();
    let common = root
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..root.len() {
        out.push("..");
    }
    for component in &target[common..] {
        out.push(component.as_os_str());
    }
    out
}

/// Render a path with forward slashes, for glob matching and reporting.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
