// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, UnusedModulesError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::UnusedModulesError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.plugin, raw.host, raw.watch))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_patterns("exclude", &cfg.plugin.exclude)?;
    validate_patterns("outside", &cfg.plugin.outside)?;
    validate_host(cfg)?;
    validate_watch(cfg)?;
    Ok(())
}

// Malformed globs are tolerated at match time; an empty string is not a glob
// at all and would resolve to `cwd` itself.
fn validate_patterns(field: &str, patterns: &[String]) -> Result<()> {
    if let Some(index) = patterns.iter().position(|p| p.trim().is_empty()) {
        return Err(UnusedModulesError::ConfigError(format!(
            "[plugin].{field}[{index}] must not be empty"
        )));
    }
    Ok(())
}

fn validate_host(cfg: &RawConfigFile) -> Result<()> {
    if let Some(manifest) = &cfg.host.manifest {
        if manifest.as_os_str().is_empty() {
            return Err(UnusedModulesError::ConfigError(
                "[host].manifest must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.debounce_ms == 0 {
        return Err(UnusedModulesError::ConfigError(
            "[watch].debounce_ms must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
