// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// What a `stat` call reports for a path.
///
/// Symlinks are not distinguished: they report whatever their target is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

/// Abstract filesystem interface, as handed over by the build host.
pub trait FileSystem: Send + Sync + Debug {
    fn stat(&self, path: &Path) -> Result<FileKind>;

    /// Return the direct children of a directory as full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Whether `stat` and `read_dir` can be answered synchronously.
    ///
    /// Hosts whose filesystem only supports async access return `false`, and
    /// every filesystem-touching operation of the detector degrades to a no-op.
    fn supports_sync_introspection(&self) -> bool {
        true
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.stat(path), Ok(FileKind::File))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.stat(path), Ok(FileKind::Directory))
    }
}

/// Return the filesystem only if it can be introspected synchronously.
pub fn usable(fs: Option<&dyn FileSystem>) -> Option<&dyn FileSystem> {
    fs.filter(|fs| fs.supports_sync_introspection())
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn stat(&self, path: &Path) -> Result<FileKind> {
        let meta = fs::metadata(path).with_context(|| format!("stat {:?}", path))?;
        let kind = if meta.is_dir() {
            FileKind::Directory
        } else if meta.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        };
        Ok(kind)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }
}
