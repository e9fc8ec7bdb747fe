// src/engine/runtime.rs

use std::fmt;
use std::path::Path;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::core::UnusedFilesPlugin;
use crate::engine::report::UnusedReport;
use crate::engine::resolver::force_include;
use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::host::{BuildWarning, BuiltModule, Compilation};
use crate::watch::event_handler::WatchEvent;

impl UnusedFilesPlugin {
    /// Build-phase hook: force every outside file into the graph.
    ///
    /// Resolves only after every request settled. A failure aborts this
    /// plugin's part of the build; the caller must not judge reachability.
    pub async fn make(&self, compilation: &mut dyn Compilation) -> Result<Vec<BuiltModule>> {
        let outside = self.outside_files()?;
        let context = compilation.context().to_path_buf();
        let built = force_include(compilation, &context, &outside).await?;
        Ok(built)
    }
}

/// Result of one build as seen by the detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// 1 for the initial build, then one more per watch cycle.
    pub build: usize,
    pub forced: usize,
    pub report: UnusedReport,
}

impl BuildOutcome {
    pub fn warning(&self) -> Option<BuildWarning> {
        self.report.to_warning()
    }
}

/// Drives the plugin's hooks in host phase order.
///
/// A real bundler sequences the hooks itself; this runtime does it for hosts
/// that only expose a `Compilation`, such as the manifest host:
///
/// 1. watch run (watch cycles only)
/// 2. this-compilation: scan
/// 3. make: forced inclusion, fully awaited
/// 4. seal
/// 5. process-assets: diff and report
pub struct BuildRuntime {
    plugin: UnusedFilesPlugin,
    builds: usize,
}

impl fmt::Debug for BuildRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildRuntime")
            .field("builds", &self.builds)
            .finish_non_exhaustive()
    }
}

impl BuildRuntime {
    /// Runs the initialization hook against `context`.
    pub fn new(mut plugin: UnusedFilesPlugin, context: &Path) -> Self {
        plugin.initialize(context);
        Self { plugin, builds: 0 }
    }

    pub fn plugin(&self) -> &UnusedFilesPlugin {
        &self.plugin
    }

    pub fn into_plugin(self) -> UnusedFilesPlugin {
        self.plugin
    }

    /// Run one build. `watch` carries the change lists of a watch cycle.
    pub async fn build(
        &mut self,
        compilation: &mut dyn Compilation,
        watch: Option<&WatchEvent>,
    ) -> Result<BuildOutcome> {
        self.builds += 1;
        let build = self.builds;
        info!(build, "build started");

        if let Some(event) = watch {
            let fs = compilation.input_file_system();
            self.plugin.watch_run(fs.as_deref(), event);
        }

        self.plugin.this_compilation(compilation)?;

        let forced = self.plugin.make(compilation).await?;
        compilation.seal();

        let report = self.plugin.process_assets(compilation)?;
        info!(build, unused = report.files.len(), "build finished");

        Ok(BuildOutcome {
            build,
            forced: forced.len(),
            report,
        })
    }

    /// Watch session: one initial build, then one build per `Rebuild` event.
    ///
    /// `new_compilation` creates the host compilation for each build and
    /// `on_build` sees every outcome. A failed build is logged and the session
    /// keeps going; only failing to create a compilation ends it.
    pub async fn run_watch<C, F, O>(
        mut self,
        mut events: mpsc::Receiver<RuntimeEvent>,
        mut new_compilation: F,
        mut on_build: O,
    ) -> Result<UnusedFilesPlugin>
    where
        C: Compilation,
        F: FnMut() -> Result<C>,
        O: FnMut(&BuildOutcome),
    {
        info!("watch session started");

        let mut next: Option<WatchEvent> = None;
        loop {
            let mut compilation = new_compilation()?;
            match self.build(&mut compilation, next.as_ref()).await {
                Ok(outcome) => on_build(&outcome),
                Err(err) => error!(error = %err, "build failed"),
            }

            let event = match events.recv().await {
                Some(event) => event,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };
            debug!(?event, "runtime received event");

            match event {
                RuntimeEvent::Rebuild(change) => next = Some(change),
                RuntimeEvent::ShutdownRequested => {
                    info!("shutdown requested; stopping watch session");
                    break;
                }
            }
        }

        Ok(self.plugin)
    }
}
