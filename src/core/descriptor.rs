//! Registry metadata model.
//!
//! A [`ComponentDescriptor`] is one registry document: identity, where the
//! sources live, which versions exist and what the component depends on.
//! Each [`VersionDescriptor`] pins a version label to an exact source
//! revision plus the build options that version is configured with.
//!
//! Documents are JSON:
//!
//! ```json
//! {
//!   "name": "spdlog",
//!   "description": "Fast C++ logging library",
//!   "homepage": "https://github.com/gabime/spdlog",
//!   "license": "MIT",
//!   "repository": { "type": "github", "url": "https://github.com/gabime/spdlog" },
//!   "versions": {
//!     "1.12.0": {
//!       "git_tag": "v1.12.0",
//!       "tested": true,
//!       "cmake_options": { "SPDLOG_FMT_EXTERNAL": "ON" }
//!     }
//!   },
//!   "default_version": "1.12.0",
//!   "targets": ["spdlog::spdlog"],
//!   "dependencies": [{ "name": "fmt", "version_constraint": ">=10.0.0" }],
//!   "maintainers": ["someone"]
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::constraint::VersionConstraint;
use crate::core::options::BuildOptions;

/// A component's registry entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// Unique component name
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub homepage: String,

    /// SPDX license identifier
    #[serde(default)]
    pub license: String,

    /// Where the sources live
    pub repository: Repository,

    /// Version label -> version details, in document order
    pub versions: IndexMap<String, VersionDescriptor>,

    /// Version used when a request names none
    pub default_version: String,

    /// Build targets the component exports, e.g. `fmt::fmt`
    #[serde(default)]
    pub targets: Vec<String>,

    /// Components that must be activated first
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,

    #[serde(default)]
    pub maintainers: Vec<String>,
}

/// Source repository of a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    /// Hosting kind: `github`, `gitlab` or `url`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Clone URL
    pub url: String,
}

/// One available version of a component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionDescriptor {
    /// Tag or commit identifying the exact source snapshot
    #[serde(rename = "git_tag")]
    pub revision: String,

    /// Oldest host build-system version this revision supports
    #[serde(
        default,
        alias = "minimum_cmake_version",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_host_version: Option<String>,

    /// Whether this version was verified by the registry maintainers
    #[serde(default)]
    pub tested: bool,

    /// Default build options for this version
    #[serde(rename = "cmake_options", default)]
    pub build_options: BuildOptions,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A declared dependency on another component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySpec {
    pub name: String,

    /// Parsed but not used when picking the dependency's version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_constraint: Option<VersionConstraint>,

    #[serde(default)]
    pub optional: bool,
}

impl ComponentDescriptor {
    /// Look up a version by label.
    pub fn version(&self, label: &str) -> Option<&VersionDescriptor> {
        self.versions.get(label)
    }

    /// Version labels in document order.
    pub fn version_labels(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    /// Check the fields activation relies on.
    ///
    /// Returns a description of the first problem found.
    pub fn check(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("`name` is empty".to_string());
        }
        if self.repository.url.trim().is_empty() {
            return Err("`repository.url` is empty".to_string());
        }
        if self.default_version.trim().is_empty() {
            return Err("`default_version` is empty".to_string());
        }
        for (label, version) in &self.versions {
            if version.revision.trim().is_empty() {
                return Err(format!("version `{}` has an empty `git_tag`", label));
            }
        }
        for dep in &self.dependencies {
            if dep.name.trim().is_empty() {
                return Err("dependency with an empty `name`".to_string());
            }
        }
        Ok(())
    }
}
