// src/host/mod.rs

//! Boundary with the build host.
//!
//! The detector never builds a module graph itself. It talks to the host's
//! compilation through the [`Compilation`] trait, which keeps the host the
//! single source of truth for what was resolved:
//!
//! - [`ModuleGraphView`] is the read-only list of finished modules; each one
//!   may expose a backing file ("resource").
//! - [`Compilation::add_module_tree`] asks the host to resolve and build a
//!   file as a synthetic entry. The host answers through a `oneshot` sender,
//!   from whatever task it likes.
//! - Warnings go back through [`Compilation::push_warning`].
//!
//! [`manifest`] provides a host backed by a bundler stats file. Tests provide
//! their own `Compilation` that scripts replies.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::oneshot;

use crate::fs::FileSystem;

pub mod manifest;

/// A module as the host built it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltModule {
    pub identifier: String,
    /// Absolute backing file; `None` for virtual modules.
    pub resource: Option<PathBuf>,
}

impl BuiltModule {
    pub fn new(identifier: impl Into<String>, resource: Option<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            resource,
        }
    }

    /// A module backed by `file`, identified by its path.
    pub fn from_file(file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        Self {
            identifier: file.to_string_lossy().into_owned(),
            resource: Some(file),
        }
    }

    pub fn virtual_module(identifier: impl Into<String>) -> Self {
        Self::new(identifier, None)
    }
}

/// Dependency synthesized for a forced inclusion, as if `request` had been
/// imported from the build context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDependency {
    pub request: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTreeRequest {
    pub context: PathBuf,
    pub dependency: EntryDependency,
}

/// Reply channel for `add_module_tree`.
///
/// Dropping it without sending is treated as "no module".
pub type ModuleTreeCallback = oneshot::Sender<anyhow::Result<BuiltModule>>;

/// A diagnostic attached to the current build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildWarning {
    pub origin: String,
    pub message: String,
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.origin, self.message)
    }
}

/// Read-only view over the finished module graph of one build.
pub trait ModuleGraphView {
    fn modules(&self) -> Box<dyn Iterator<Item = &BuiltModule> + '_>;
}

impl ModuleGraphView for [BuiltModule] {
    fn modules(&self) -> Box<dyn Iterator<Item = &BuiltModule> + '_> {
        Box::new(self.iter())
    }
}

impl ModuleGraphView for Vec<BuiltModule> {
    fn modules(&self) -> Box<dyn Iterator<Item = &BuiltModule> + '_> {
        Box::new(self.iter())
    }
}

/// One build ("compilation") of the host.
pub trait Compilation: Send {
    /// Directory the host resolves entry requests from.
    fn context(&self) -> &Path;

    /// The host's filesystem, if it exposes one.
    fn input_file_system(&self) -> Option<Arc<dyn FileSystem>>;

    /// Ask the host to watch a directory for this build.
    fn add_context_dependency(&mut self, path: &Path);

    /// Resolve and build a module tree for `request`; the host replies on
    /// `callback` once done.
    fn add_module_tree(&mut self, request: ModuleTreeRequest, callback: ModuleTreeCallback);

    /// Called once every build-phase contribution has settled. After this the
    /// module graph is final.
    fn seal(&mut self) {}

    fn module_graph(&self) -> &dyn ModuleGraphView;

    fn push_warning(&mut self, warning: BuildWarning);
}
