// src/engine/resolver.rs

//! Forced inclusion: asking the host to build files that nothing imports
//! statically, so they are not judged unused.

use std::future::Future;
use std::path::{Path, PathBuf};

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::errors::ModuleResolutionError;
use crate::host::{BuiltModule, Compilation, EntryDependency, ModuleTreeRequest};

/// Request a module tree for `file`, rooted at `context`.
///
/// The request is handed to the host immediately; the returned future only
/// waits for the reply. It fails if the host reports an error or drops the
/// callback without answering.
pub fn add_module_tree(
    compilation: &mut dyn Compilation,
    context: &Path,
    file: &Path,
) -> impl Future<Output = Result<BuiltModule, ModuleResolutionError>> + Send + use<> {
    let (tx, rx) = oneshot::channel();
    let request = ModuleTreeRequest {
        context: context.to_path_buf(),
        dependency: EntryDependency {
            request: file.to_string_lossy().into_owned(),
        },
    };
    compilation.add_module_tree(request, tx);

    let file = file.to_path_buf();
    async move {
        match rx.await {
            Ok(Ok(module)) => Ok(module),
            Ok(Err(err)) => Err(ModuleResolutionError::Host {
                file,
                message: format!("{err:#}"),
            }),
            Err(_) => Err(ModuleResolutionError::NoModule { file }),
        }
    }
}

/// Force every file in `files` into the build and wait for all of them.
///
/// All requests are dispatched before any reply is awaited, and every reply
/// is awaited even after a failure. The first failure (in `files` order) is
/// returned once nothing is pending any more.
pub async fn force_include(
    compilation: &mut dyn Compilation,
    context: &Path,
    files: &[PathBuf],
) -> Result<Vec<BuiltModule>, ModuleResolutionError> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    info!(count = files.len(), "forcing outside files into the module graph");

    let pending: Vec<_> = files
        .iter()
        .map(|file| add_module_tree(compilation, context, file))
        .collect();

    let mut built = Vec::with_capacity(pending.len());
    let mut first_error = None;

    for reply in pending {
        match reply.await {
            Ok(module) => {
                debug!(module = %module.identifier, "forced module built");
                built.push(module);
            }
            Err(err) => {
                warn!(error = %err, "forced inclusion failed");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(built),
    }
}
