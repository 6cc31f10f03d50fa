//! Run configuration for EcoTrack.
//!
//! Configuration is layered, lowest priority first:
//!
//! 1. Hardcoded defaults
//! 2. TOML config file (`ecotrack.toml` in the working directory, or `--config`)
//! 3. Environment variables (`ECOTRACK_*` prefix)
//! 4. Command-line flags (applied by the CLI)
//!
//! # Example
//!
//! ```toml
//! input = "shipments/q3.csv"
//! log_file = "ecotrack.log"
//! log_level = "debug"
//! expensive_modes = ["plane", "truck"]
//!
//! [factors]
//! plane = 0.06
//! barge = 0.008
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{EcoTrackError, ErrorCode, Result};
use crate::factors::EmissionsFactorTable;
use crate::insights::default_expensive_modes;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "ecotrack.toml";

/// Valid log levels for configuration validation.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcoTrackConfig {
    /// Shipment CSV to analyze.
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Diagnostic log file; an empty path disables it.
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Transport modes that produce a reduction suggestion.
    #[serde(default = "default_expensive_modes")]
    pub expensive_modes: Vec<String>,

    /// Emissions factor overrides, merged over the built-in table.
    #[serde(default)]
    pub factors: BTreeMap<String, f64>,
}

fn default_input() -> PathBuf {
    PathBuf::from("supply_chain_data.csv")
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("ecotrack.log"))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EcoTrackConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            log_file: default_log_file(),
            log_level: default_log_level(),
            expensive_modes: default_expensive_modes(),
            factors: BTreeMap::new(),
        }
    }
}

impl EcoTrackConfig {
    /// Load defaults, then the config file, then the process environment.
    ///
    /// An explicit `path` must exist; the implicit `ecotrack.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.merge_env_vars();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            let code = if e.kind() == io::ErrorKind::NotFound {
                ErrorCode::CONFIG_NOT_FOUND
            } else {
                ErrorCode::CONFIG_GENERIC
            };
            EcoTrackError::config(
                code,
                format!("could not read config file {}", path.display()),
            )
            .with_source(e)
        })?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            EcoTrackError::Config {
                code,
                message,
                source,
            } => EcoTrackError::Config {
                code,
                message: format!("{}: {message}", path.display()),
                source,
            },
            other => other,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            EcoTrackError::config(ErrorCode::CONFIG_PARSE_ERROR, "invalid TOML").with_source(e)
        })
    }

    pub fn merge_env_vars(&mut self) {
        self.merge_env_with(|key| std::env::var(key).ok());
    }

    /// Apply `ECOTRACK_*` overrides using `lookup` to read variables.
    pub fn merge_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(input) = lookup("ECOTRACK_INPUT") {
            self.input = PathBuf::from(input);
        }

        if let Some(log_file) = lookup("ECOTRACK_LOG_FILE") {
            self.log_file = Some(PathBuf::from(log_file));
        }

        if let Some(log_level) = lookup("ECOTRACK_LOG_LEVEL") {
            self.log_level = log_level;
        }

        if let Some(modes) = lookup("ECOTRACK_EXPENSIVE_MODES") {
            self.expensive_modes = modes
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect();
        }
    }

    /// The log file to append to, if logging to a file is enabled
    pub fn effective_log_file(&self) -> Option<&Path> {
        self.log_file
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        let level = self.log_level.to_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            return Err(EcoTrackError::config(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!(
                    "invalid log_level '{}', expected one of: {}",
                    self.log_level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            ));
        }

        if self.input.as_os_str().is_empty() {
            return Err(EcoTrackError::config(
                ErrorCode::CONFIG_INVALID_VALUE,
                "input path must not be empty",
            ));
        }

        self.factor_table().map(|_| ())
    }

    /// Built-in factors with this config's overrides applied
    pub fn factor_table(&self) -> Result<EmissionsFactorTable> {
        EmissionsFactorTable::with_overrides(&self.factors)
    }
}
