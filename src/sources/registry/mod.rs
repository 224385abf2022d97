//! Filesystem registry - component metadata on disk.
//!
//! # Registry Structure
//!
//! ```text
//! registry/
//! └── packages/
//!     ├── fmt.json        # One document per component
//!     └── spdlog.json
//! ```
//!
//! Each document carries every version of the component; see
//! [`crate::core::descriptor`] for the shape. Documents are re-read on every
//! lookup.

pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::{ComponentDescriptor, VersionDescriptor};
use crate::resolver::ActivationError;
use crate::sources::MetadataStore;

pub use validate::{validate_document, validate_registry, ValidationReport};

/// Directory under the registry root holding component documents.
pub const PACKAGES_DIR: &str = "packages";

/// A registry rooted at a local directory.
#[derive(Debug, Clone)]
pub struct FsRegistry {
    root: PathBuf,
}

impl FsRegistry {
    /// Create a registry for the given root directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsRegistry { root: root.into() }
    }

    /// Get the registry root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the component documents.
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join(PACKAGES_DIR)
    }

    /// Path of a component's document.
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.packages_dir().join(format!("{}.json", name))
    }

    /// Names of all components in the registry, sorted.
    pub fn component_names(&self) -> Result<Vec<String>> {
        let dir = self.packages_dir();
        if !dir.is_dir() {
            bail!(
                "registry packages directory not found: {}\n\
                 hint: pass --registry or set `registry.path` in .ccr/config.toml",
                dir.display()
            );
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("failed to read registry directory: {}", dir.display()))?
        {
            let path = entry?.path();
            if !path.is_file() || path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Read and parse a component document.
    fn load(&self, name: &str) -> Result<ComponentDescriptor, ActivationError> {
        if !is_lookup_name(name) {
            return Err(ActivationError::NotFound {
                name: name.to_string(),
                version: None,
            });
        }

        let path = self.document_path(name);
        if !path.is_file() {
            return Err(ActivationError::NotFound {
                name: name.to_string(),
                version: None,
            });
        }

        tracing::debug!("Loading registry document {}", path.display());

        let malformed = |reason: String| ActivationError::MalformedMetadata {
            name: name.to_string(),
            version: None,
            path: path.clone(),
            reason,
        };

        let content = std::fs::read_to_string(&path)
            .map_err(|e| malformed(format!("failed to read document: {}", e)))?;

        let descriptor: ComponentDescriptor =
            serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;

        if descriptor.name != name {
            return Err(malformed(format!(
                "document declares name `{}`",
                descriptor.name
            )));
        }
        descriptor.check().map_err(malformed)?;

        Ok(descriptor)
    }
}

impl MetadataStore for FsRegistry {
    fn lookup(&self, name: &str) -> Result<ComponentDescriptor, ActivationError> {
        self.load(name)
    }

    fn lookup_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<VersionDescriptor, ActivationError> {
        let descriptor = self
            .load(name)
            .map_err(|e| e.with_requested_version(Some(version)))?;
        match descriptor.version(version) {
            Some(v) => Ok(v.clone()),
            None => Err(ActivationError::VersionNotFound {
                name: name.to_string(),
                version: version.to_string(),
                available: descriptor.version_labels(),
            }),
        }
    }
}

/// Names that can be mapped to a document path without escaping the
/// packages directory.
fn is_lookup_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}
