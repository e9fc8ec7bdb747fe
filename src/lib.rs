// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod host;
pub mod logging;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::{default_config_path, load_and_validate};
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::engine::{BuildOutcome, BuildRuntime, RuntimeEvent, UnusedFilesPlugin};
use crate::errors::UnusedModulesError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::host::manifest::{ManifestCompilation, StatsManifest};
use crate::watch::path_utils::resolve;
use crate::watch::spawn_watcher;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (plus the `--manifest` override)
/// - the manifest host
/// - the plugin and its build runtime
/// - (optional) file watcher and Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_config(&args)?;

    let manifest_path = cfg.host().manifest.clone().ok_or_else(|| {
        UnusedModulesError::ConfigError(
            "no stats manifest: set [host].manifest or pass --manifest".to_string(),
        )
    })?;

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let manifest = StatsManifest::load(fs.as_ref(), &manifest_path)?;

    let plugin = UnusedFilesPlugin::new(cfg.plugin().clone());
    let mut runtime = BuildRuntime::new(plugin, &manifest.context);

    if args.dry_run {
        print_dry_run(&cfg, runtime.plugin(), &manifest_path);
        return Ok(());
    }

    if !args.watch {
        let mut compilation = ManifestCompilation::new(&manifest, Some(Arc::clone(&fs)));
        let outcome = runtime.build(&mut compilation, None).await?;
        print_outcome(&outcome);
        return Ok(());
    }

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let watch_root = runtime
        .plugin()
        .paths()
        .map(|p| p.cwd.clone())
        .unwrap_or_else(|| manifest.context.clone());
    let debounce = Duration::from_millis(cfg.watch().debounce_ms);
    let _watcher_handle = spawn_watcher(watch_root, rt_tx.clone(), debounce)?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // The bundler rewrites the manifest on every build, so read it afresh.
    let new_compilation = || -> errors::Result<ManifestCompilation> {
        let manifest = StatsManifest::load(fs.as_ref(), &manifest_path)?;
        Ok(ManifestCompilation::new(&manifest, Some(Arc::clone(&fs))))
    };

    runtime.run_watch(rt_rx, new_compilation, print_outcome).await?;
    info!("watch session finished");
    Ok(())
}

/// Load the config named on the command line.
///
/// A missing default config file is not an error: every option has a
/// default and the manifest can come from `--manifest`.
pub(crate) fn load_config(args: &CliArgs) -> Result<ConfigFile> {
    let config_path = PathBuf::from(&args.config);

    let mut cfg = if config_path == default_config_path() && !config_path.exists() {
        debug!("no config file; using defaults");
        ConfigFile::try_from(RawConfigFile::default())?
    } else {
        load_and_validate(&config_path)?
    };

    if let Some(manifest) = &args.manifest {
        let cwd = std::env::current_dir()?;
        cfg.set_manifest(resolve(&cwd, manifest));
    }

    Ok(cfg)
}

fn print_outcome(outcome: &BuildOutcome) {
    match outcome.warning() {
        Some(warning) => println!("WARNING in {}\n", warning),
        None => println!("[build {}] no unused files", outcome.build),
    }
}

/// Dry-run output: resolved paths and compiled patterns.
fn print_dry_run(cfg: &ConfigFile, plugin: &UnusedFilesPlugin, manifest: &Path) {
    println!("unused-modules dry-run");
    println!("  manifest = {}", manifest.display());
    if let Some(paths) = plugin.paths() {
        println!("  root = {}", paths.root.display());
        println!("  cwd = {}", paths.cwd.display());
    }
    println!("  watch.debounce_ms = {}", cfg.watch().debounce_ms);
    println!();

    if let Ok(patterns) = plugin.patterns() {
        println!("exclude ({}):", patterns.exclude.len());
        for pattern in &patterns.exclude {
            println!("  - {}", pattern.as_str());
        }
        println!("outside ({}):", patterns.outside.len());
        for pattern in &patterns.outside {
            println!("  - {}", pattern.as_str());
        }
    }

    debug!("dry-run complete (no build)");
}
