// src/errors.rs

//! Crate-wide error types and aliases.

use std::path::PathBuf;

use thiserror::Error;

/// Raised when a forced inclusion could not be turned into a module.
///
/// An incomplete module graph must never produce an "unused" verdict, so this
/// is the one failure that stops the detector's build phase.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModuleResolutionError {
    #[error("failed to build module tree for {file:?}: {message}")]
    Host { file: PathBuf, message: String },

    #[error("module not found for {file:?}")]
    NoModule { file: PathBuf },
}

impl ModuleResolutionError {
    pub fn file(&self) -> &PathBuf {
        match self {
            ModuleResolutionError::Host { file, .. } => file,
            ModuleResolutionError::NoModule { file } => file,
        }
    }
}

#[derive(Error, Debug)]
pub enum UnusedModulesError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Module resolution error: {0}")]
    ModuleResolution(#[from] ModuleResolutionError),

    #[error("plugin hook called before initialize")]
    NotInitialized,

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Manifest parsing error: {0}")]
    ManifestError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, UnusedModulesError>;
