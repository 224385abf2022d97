//! Registry fixtures for common test scenarios.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;
use tempfile::TempDir;

use crate::sources::registry::PACKAGES_DIR;
use crate::sources::FsRegistry;

/// A registry in a temporary directory.
pub struct RegistryFixture {
    dir: TempDir,
}

impl RegistryFixture {
    /// Create an empty registry.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(PACKAGES_DIR)).unwrap();
        RegistryFixture { dir }
    }

    /// Registry with `fmt` (default 10.1.0, no dependencies) and `spdlog`
    /// (default 1.12.0, depends on `fmt >=10.0.0`).
    pub fn fmt_spdlog() -> Self {
        let fixture = Self::new();
        fixture.add(
            Self::component("fmt", "10.1.0")
                .version_with_options("10.1.0", "10.1.0", &[("FMT_DOC", "OFF"), ("FMT_TEST", "OFF")])
                .version("9.1.0", "9.1.0")
                .build(),
        );
        fixture.add(
            Self::component("spdlog", "1.12.0")
                .version_with_options("1.12.0", "v1.12.0", &[("SPDLOG_FMT_EXTERNAL", "ON")])
                .version("1.11.0", "v1.11.0")
                .dependency("fmt", Some(">=10.0.0"))
                .build(),
        );
        fixture
    }

    /// Start building a component document.
    pub fn component(name: &str, default_version: &str) -> ComponentBuilder {
        ComponentBuilder {
            name: name.to_string(),
            default_version: default_version.to_string(),
            versions: IndexMap::new(),
            dependencies: Vec::new(),
        }
    }

    /// Root directory of the registry.
    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// A registry reading this fixture.
    pub fn registry(&self) -> FsRegistry {
        FsRegistry::new(self.dir.path())
    }

    /// Write a component document, replacing any existing one.
    pub fn add(&self, doc: ComponentDoc) {
        self.write_raw(&doc.name, &serde_json::to_string_pretty(&doc).unwrap());
    }

    /// Write raw document text for a name.
    pub fn write_raw(&self, name: &str, content: &str) {
        std::fs::write(self.registry().document_path(name), content).unwrap();
    }
}

impl Default for RegistryFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a valid component document.
pub struct ComponentBuilder {
    name: String,
    default_version: String,
    versions: IndexMap<String, VersionDoc>,
    dependencies: Vec<DependencyDoc>,
}

/// A registry document. Serializes versions and options in insertion order.
#[derive(Serialize)]
pub struct ComponentDoc {
    name: String,
    description: String,
    homepage: String,
    license: String,
    repository: RepositoryDoc,
    versions: IndexMap<String, VersionDoc>,
    default_version: String,
    targets: Vec<String>,
    dependencies: Vec<DependencyDoc>,
    maintainers: Vec<String>,
}

#[derive(Serialize)]
struct RepositoryDoc {
    #[serde(rename = "type")]
    kind: String,
    url: String,
}

#[derive(Serialize)]
struct VersionDoc {
    git_tag: String,
    tested: bool,
    cmake_options: IndexMap<String, String>,
}

#[derive(Serialize)]
struct DependencyDoc {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_constraint: Option<String>,
}

impl ComponentBuilder {
    /// Add a version pinned to a tag.
    pub fn version(self, label: &str, tag: &str) -> Self {
        self.version_with_options(label, tag, &[])
    }

    /// Add a version with default build options.
    pub fn version_with_options(mut self, label: &str, tag: &str, options: &[(&str, &str)]) -> Self {
        self.versions.insert(
            label.to_string(),
            VersionDoc {
                git_tag: tag.to_string(),
                tested: true,
                cmake_options: options
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        );
        self
    }

    /// Declare a dependency.
    pub fn dependency(mut self, name: &str, constraint: Option<&str>) -> Self {
        self.dependencies.push(DependencyDoc {
            name: name.to_string(),
            version_constraint: constraint.map(str::to_string),
        });
        self
    }

    pub fn build(self) -> ComponentDoc {
        ComponentDoc {
            description: format!("The {} library", self.name),
            homepage: format!("https://example.com/{}", self.name),
            license: "MIT".to_string(),
            repository: RepositoryDoc {
                kind: "github".to_string(),
                url: format!("https://github.com/example/{}", self.name),
            },
            versions: self.versions,
            default_version: self.default_version,
            targets: vec![format!("{0}::{0}", self.name)],
            dependencies: self.dependencies,
            maintainers: vec!["ccr-maintainers".to_string()],
            name: self.name,
        }
    }
}
