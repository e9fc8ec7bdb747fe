// src/engine/core.rs

//! The detector's synchronous core.
//!
//! `UnusedFilesPlugin` owns the options, the resolved paths, and the
//! candidate set, and exposes one method per host hook. None of these methods
//! await anything; the asynchronous build phase lives in
//! [`runtime`](super::runtime).

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::model::PluginOptions;
use crate::engine::candidates::CandidateFiles;
use crate::engine::differ::diff;
use crate::engine::report::{UnusedReport, build_report};
use crate::engine::PathState;
use crate::errors::{Result, UnusedModulesError};
use crate::fs::FileSystem;
use crate::host::Compilation;
use crate::watch::event_handler::{WatchEvent, apply_watch_event};
use crate::watch::path_utils::resolve;
use crate::watch::patterns::PatternSet;

#[derive(Debug, Clone)]
pub struct UnusedFilesPlugin {
    options: PluginOptions,
    paths: Option<PathState>,
    files: CandidateFiles,
}

impl UnusedFilesPlugin {
    pub const NAME: &'static str = "UnusedFilesPlugin";

    pub fn new(options: PluginOptions) -> Self {
        Self {
            options,
            paths: None,
            files: CandidateFiles::new(),
        }
    }

    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    pub fn files(&self) -> &CandidateFiles {
        &self.files
    }

    /// Resolved paths, once `initialize` ran.
    pub fn paths(&self) -> Option<&PathState> {
        self.paths.as_ref()
    }

    fn path_state(&self) -> Result<&PathState> {
        self.paths.as_ref().ok_or(UnusedModulesError::NotInitialized)
    }

    /// Initialization hook: resolve `root` and `cwd` against the build context.
    ///
    /// Must run before any other hook. Calling it again re-resolves the paths
    /// but keeps the candidate set.
    pub fn initialize(&mut self, context: &Path) -> &PathState {
        let root = match &self.options.root {
            Some(root) => resolve(context, root),
            None => resolve(context, "."),
        };
        let cwd = resolve(&root, &self.options.cwd);
        debug!(root = ?root, cwd = ?cwd, "plugin initialized");
        self.paths.insert(PathState { root, cwd })
    }

    /// Compiled patterns for the current build.
    pub fn patterns(&self) -> Result<PatternSet> {
        let paths = self.path_state()?;
        Ok(PatternSet::from_options(&self.options, &paths.cwd))
    }

    /// Watch hook: apply the host's change lists before the next build.
    pub fn watch_run(&mut self, fs: Option<&dyn FileSystem>, event: &WatchEvent) {
        let before = self.files.len();
        apply_watch_event(&mut self.files, fs, event);
        debug!(before, after = self.files.len(), "watch event applied");
    }

    /// Compilation hook: watch `cwd` and scan it for candidate files.
    pub fn this_compilation(&mut self, compilation: &mut dyn Compilation) -> Result<()> {
        let cwd = self.path_state()?.cwd.clone();
        compilation.add_context_dependency(&cwd);

        let fs = compilation.input_file_system();
        self.files.scan(fs.as_deref(), &cwd);
        Ok(())
    }

    /// Candidates that must be forced into the graph, in a stable order.
    pub fn outside_files(&self) -> Result<Vec<PathBuf>> {
        let patterns = self.patterns()?;
        if patterns.outside.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .files
            .sorted()
            .into_iter()
            .filter(|path| patterns.is_outside(path))
            .collect())
    }

    /// Asset-processing hook: diff the sealed graph against the candidates
    /// and attach at most one warning to the compilation.
    pub fn process_assets(&self, compilation: &mut dyn Compilation) -> Result<UnusedReport> {
        let paths = self.path_state()?;
        let patterns = self.patterns()?;

        let unused = diff(&self.files, compilation.module_graph());
        let report = build_report(unused, &patterns, &paths.root);

        info!(
            candidates = self.files.len(),
            unused = report.files.len(),
            excluded = report.excluded,
            "reachability check finished"
        );

        if let Some(warning) = report.to_warning() {
            warn!("{}", warning.message);
            compilation.push_warning(warning);
        }
        Ok(report)
    }
}
