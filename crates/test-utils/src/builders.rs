#![allow(dead_code)]

use std::path::PathBuf;

use unused_modules::config::{ConfigFile, PluginOptions, RawConfigFile};
use unused_modules::fs::mock::MockFileSystem;

/// Builder for `PluginOptions` to simplify test setup.
///
/// Starts from the defaults (default `exclude`, no `outside`).
pub struct PluginOptionsBuilder {
    options: PluginOptions,
}

impl PluginOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: PluginOptions::default(),
        }
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        self.options.cwd = PathBuf::from(cwd);
        self
    }

    pub fn root(mut self, root: &str) -> Self {
        self.options.root = Some(PathBuf::from(root));
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.options.exclude.push(pattern.to_string());
        self
    }

    pub fn no_exclude(mut self) -> Self {
        self.options.exclude.clear();
        self
    }

    pub fn outside(mut self, pattern: &str) -> Self {
        self.options.outside.push(pattern.to_string());
        self
    }

    pub fn build(self) -> PluginOptions {
        self.options
    }

    /// Wrap the options in a validated `ConfigFile`.
    pub fn build_config(self) -> ConfigFile {
        let raw = RawConfigFile {
            plugin: self.options,
            ..RawConfigFile::default()
        };
        ConfigFile::try_from(raw).expect("Failed to build valid config from builder")
    }
}

impl Default for PluginOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for an in-memory project tree.
pub struct ProjectBuilder {
    root: PathBuf,
    fs: MockFileSystem,
}

impl ProjectBuilder {
    pub fn new(root: &str) -> Self {
        let fs = MockFileSystem::new();
        fs.add_dir(root);
        Self {
            root: PathBuf::from(root),
            fs,
        }
    }

    /// Add a file at `rel` below the root.
    pub fn file(self, rel: &str) -> Self {
        self.fs.add_file(self.root.join(rel), "");
        self
    }

    pub fn dir(self, rel: &str) -> Self {
        self.fs.add_dir(self.root.join(rel));
        self
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn build(self) -> MockFileSystem {
        self.fs
    }
}
