// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::watch::path_utils::resolve;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [plugin]
/// cwd = "src"
/// exclude = ["**/*.md", "**/*.stories.tsx"]
/// outside = ["pages/**/*.tsx"]
///
/// [host]
/// manifest = "dist/stats.json"
///
/// [watch]
/// debounce_ms = 200
/// ```
///
/// All sections are optional and have reasonable defaults. This is the
/// unvalidated form; convert it with `ConfigFile::try_from`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub plugin: PluginOptions,

    #[serde(default)]
    pub host: HostSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// Options handed to the plugin at construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginOptions {
    /// Base directory for patterns and the scan, relative to `root`.
    #[serde(default = "default_cwd")]
    pub cwd: PathBuf,

    /// Files never reported, even when unused.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Files forced into the module graph before judging reachability.
    #[serde(default)]
    pub outside: Vec<String>,

    /// Base for relative paths in the report. Defaults to the build context.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

pub fn default_cwd() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_exclude() -> Vec<String> {
    [
        "**/*.md",
        "**/*.d.ts",
        "**/types.{js,ts}",
        "**/*.types.{js,ts}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            cwd: default_cwd(),
            exclude: default_exclude(),
            outside: Vec::new(),
            root: None,
        }
    }
}

/// `[host]` section: where the reference host reads its module graph from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostSection {
    /// Path to a bundler stats manifest (JSON).
    #[serde(default)]
    pub manifest: Option<PathBuf>,
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// How long to collect filesystem events into one rebuild.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    200
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    plugin: PluginOptions,
    host: HostSection,
    watch: WatchSection,
}

impl ConfigFile {
    /// Only `validate.rs` should call this.
    pub(crate) fn new_unchecked(plugin: PluginOptions, host: HostSection, watch: WatchSection) -> Self {
        Self { plugin, host, watch }
    }

    pub fn plugin(&self) -> &PluginOptions {
        &self.plugin
    }

    pub fn host(&self) -> &HostSection {
        &self.host
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn set_manifest(&mut self, manifest: PathBuf) {
        self.host.manifest = Some(manifest);
    }

    /// Resolve relative `root` and `manifest` against the config file's directory.
    pub(crate) fn anchor_to(mut self, base: &Path) -> Self {
        if let Some(root) = self.plugin.root.take() {
            self.plugin.root = Some(resolve(base, root));
        }
        if let Some(manifest) = self.host.manifest.take() {
            self.host.manifest = Some(resolve(base, manifest));
        }
        self
    }
}
