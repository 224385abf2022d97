//! Global context for ccr operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::{BaseDirs, ProjectDirs};

use crate::util::config::{load_config, Config};

/// Project directories for ccr
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "ccr", "ccr"));

/// Default registry directory name, relative to the working directory.
pub const DEFAULT_REGISTRY_DIR: &str = "registry";

/// Default lockfile name.
pub const DEFAULT_LOCKFILE: &str = "ccr.lock";

/// Default name of the generated CMake script.
pub const DEFAULT_SCRIPT: &str = "ccr-deps.cmake";

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global ccr data (~/.ccr/)
    home: PathBuf,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = BaseDirs::new()
            .map(|b| b.home_dir().join(".ccr"))
            .unwrap_or_else(|| PathBuf::from(".ccr"));

        Ok(GlobalContext {
            cwd,
            home,
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project-local ccr directory.
    pub fn project_dir(&self) -> PathBuf {
        self.cwd.join(".ccr")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.project_dir().join("config.toml")
    }

    /// Get the default cache directory for git checkouts.
    pub fn default_cache_dir(&self) -> PathBuf {
        match PROJECT_DIRS.as_ref() {
            Some(dirs) => dirs.cache_dir().to_path_buf(),
            None => self.home.join("cache"),
        }
    }

    /// Load global and project configuration, merged.
    pub fn load_config(&self) -> Config {
        load_config(&self.config_path(), &self.project_config_path())
    }

    /// Resolve a possibly-relative path against the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
        assert!(ctx.config_path().ends_with(".ccr/config.toml"));
    }

    #[test]
    fn test_project_config_is_loaded() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join(".ccr")).unwrap();
        std::fs::write(
            tmp.path().join(".ccr/config.toml"),
            "[registry]\npath = \"my-registry\"\n",
        )
        .unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();
        let config = ctx.load_config();
        assert_eq!(config.registry.path, Some(PathBuf::from("my-registry")));
    }

    #[test]
    fn test_resolve_path() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();

        assert_eq!(ctx.resolve_path(Path::new("ccr.lock")), tmp.path().join("ccr.lock"));
        assert_eq!(ctx.resolve_path(Path::new("/abs/x")), PathBuf::from("/abs/x"));
    }
}
