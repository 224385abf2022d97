//! Configuration file support for ccr.
//!
//! ccr supports two configuration file locations:
//! - Global: `~/.ccr/config.toml` - User-wide defaults
//! - Project: `.ccr/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config. Command-line flags
//! take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sources::DelegateKind;

/// ccr configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Registry settings
    pub registry: RegistryConfig,

    /// Lockfile settings
    pub lockfile: LockfileConfig,

    /// Fetch delegate settings
    pub fetch: FetchConfig,
}

/// Where component metadata lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Registry root (the directory containing `packages/`)
    pub path: Option<PathBuf>,
}

/// Lockfile output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockfileConfig {
    /// Lockfile path
    pub path: Option<PathBuf>,

    /// Write a lockfile after a successful activation run
    pub enabled: bool,
}

impl Default for LockfileConfig {
    fn default() -> Self {
        LockfileConfig {
            path: None,
            enabled: true,
        }
    }
}

/// Fetch delegate selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Which delegate hands components to the build (cmake, git)
    pub delegate: Option<String>,

    /// Source checkout directory for the git delegate
    pub cache_dir: Option<PathBuf>,

    /// Output path for the generated CMake script
    pub script: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.registry.path.is_some() {
            self.registry.path = other.registry.path;
        }

        if other.lockfile.path.is_some() {
            self.lockfile.path = other.lockfile.path;
        }
        // Disabling is sticky: any layer can turn lockfile output off
        if !other.lockfile.enabled {
            self.lockfile.enabled = false;
        }

        if other.fetch.delegate.is_some() {
            self.fetch.delegate = other.fetch.delegate;
        }
        if other.fetch.cache_dir.is_some() {
            self.fetch.cache_dir = other.fetch.cache_dir;
        }
        if other.fetch.script.is_some() {
            self.fetch.script = other.fetch.script;
        }
    }

    /// Parse the configured delegate, if one is set.
    pub fn delegate(&self) -> Result<Option<DelegateKind>> {
        self.fetch
            .delegate
            .as_deref()
            .map(|s| {
                s.parse::<DelegateKind>()
                    .map_err(|e| anyhow::anyhow!("fetch.delegate: {}", e))
            })
            .transpose()
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.ccr/config.toml)
/// 2. Global config (~/.ccr/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}
