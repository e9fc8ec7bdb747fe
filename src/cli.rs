// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `unused-modules`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "unused-modules",
    version,
    about = "Report source files that a bundler build never pulled into its module graph.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "UnusedModules.toml")]
    pub config: String,

    /// Stats manifest to read the module graph from; overrides `[host].manifest`.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<String>,

    /// Keep running and re-check whenever files under the project change.
    #[arg(long)]
    pub watch: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `UNUSED_MODULES_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print resolved options and patterns, but don't build.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
