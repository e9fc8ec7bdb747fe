// src/engine/mod.rs

//! The unused-file detector.
//!
//! - [`candidates`]: the files known to exist, and the scanner.
//! - [`resolver`]: forcing `outside` files into the host's module graph.
//! - [`differ`]: candidates minus module resources.
//! - [`report`]: exclusion filtering and the batched warning.
//! - [`core`]: the plugin value with one synchronous method per hook.
//! - [`runtime`]: the async build phase and a driver that calls the hooks in
//!   host order, for single builds and watch sessions.

use std::path::PathBuf;

use crate::watch::event_handler::WatchEvent;

/// Paths resolved once by the initialization hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathState {
    /// Base for the relative paths in the report.
    pub root: PathBuf,
    /// Base for patterns, and the directory that gets scanned.
    pub cwd: PathBuf,
}

/// Events flowing into a watch session.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Files changed; run another build with these change lists.
    Rebuild(WatchEvent),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod candidates;
pub mod core;
pub mod differ;
pub mod report;
pub mod resolver;
pub mod runtime;

pub use candidates::CandidateFiles;
pub use self::core::UnusedFilesPlugin;
pub use differ::{UnusedFiles, diff};
pub use report::{UnusedReport, build_report};
pub use resolver::{add_module_tree, force_include};
pub use runtime::{BuildOutcome, BuildRuntime};
