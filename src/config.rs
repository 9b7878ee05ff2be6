// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON under the user config dir. Every field has a default, so
//! files written by older versions (or edited by hand) still load.

use crate::constants::storage;
use crate::device::DeviceCapability;
use crate::errors::{AppError, AppResult};
use crate::filters::{ExecutionStrategy, FilterId};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Last selected filter
    pub filter: FilterId,
    /// Cached device probe result (None until the first probe)
    pub high_powered: Option<bool>,
    /// Row scheduling for filter passes
    pub execution: ExecutionStrategy,
    /// Where the CLI writes filtered photos when no output is given
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> AppResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| {
                dir.join(storage::CONFIG_DIR_NAME)
                    .join(storage::CONFIG_FILE_NAME)
            })
            .ok_or_else(|| AppError::Config("no user config directory".into()))
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), ?config, "Config loaded");
        Ok(config)
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Cached capability, if the probe has already run
    pub fn capability(&self) -> Option<DeviceCapability> {
        self.high_powered.map(DeviceCapability::from)
    }

    /// Return the cached capability, or run `probe` once and cache its answer
    pub fn capability_or_probe<F>(&mut self, probe: F) -> DeviceCapability
    where
        F: FnOnce() -> DeviceCapability,
    {
        if let Some(capability) = self.capability() {
            return capability;
        }

        let capability = probe();
        info!(
            capability = capability.display_name(),
            "First run, device probed"
        );
        self.high_powered = Some(capability.is_high_powered());
        capability
    }

    /// Configured output directory, or `<Pictures>/CamerArt`
    pub fn output_dir_or_default(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| {
            dirs::picture_dir()
                .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
                .join(storage::DEFAULT_SAVE_FOLDER)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.filter, FilterId::None);
        assert_eq!(config.high_powered, None);
        assert_eq!(config.execution, ExecutionStrategy::ParallelRows);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_probe_runs_once() {
        let mut config = Config::default();
        let mut calls = 0;
        let first = config.capability_or_probe(|| {
            calls += 1;
            DeviceCapability::HighPowered
        });
        assert_eq!(first, DeviceCapability::HighPowered);
        assert_eq!(config.high_powered, Some(true));

        let second = config.capability_or_probe(|| {
            calls += 1;
            DeviceCapability::Constrained
        });
        assert_eq!(second, DeviceCapability::HighPowered);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"filter": "sepia"}"#).unwrap();
        assert_eq!(config.filter, FilterId::Sepia);
        assert_eq!(config.execution, ExecutionStrategy::ParallelRows);
    }

    #[test]
    fn test_unknown_filter_name_selects_none() {
        let config: Config = serde_json::from_str(r#"{"filter": "vaporwave"}"#).unwrap();
        assert_eq!(config.filter, FilterId::None);
    }
}
