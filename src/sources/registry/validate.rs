//! Registry document validation.
//!
//! Lookups only reject what activation cannot work with. Validation is
//! stricter and is what registry maintainers run before publishing: it
//! checks the whole document and reports every problem it finds.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;

use crate::core::constraint::VersionConstraint;
use crate::sources::registry::FsRegistry;

/// Fields every component document must carry.
const REQUIRED_FIELDS: &[&str] = &[
    "name",
    "description",
    "homepage",
    "license",
    "repository",
    "versions",
    "default_version",
    "targets",
    "maintainers",
];

/// Fields every version entry must carry.
const REQUIRED_VERSION_FIELDS: &[&str] = &["git_tag", "tested"];

const VALID_REPO_TYPES: &[&str] = &["github", "gitlab", "url"];

/// Accepted SPDX license identifiers.
const VALID_LICENSES: &[&str] = &[
    "MIT",
    "Apache-2.0",
    "BSD-2-Clause",
    "BSD-3-Clause",
    "BSL-1.0",
    "MPL-2.0",
    "LGPL-2.1",
    "LGPL-3.0",
    "GPL-2.0",
    "GPL-3.0",
    "Unlicense",
    "ISC",
    "Zlib",
    "CC0-1.0",
];

const MAX_DESCRIPTION_LEN: usize = 200;

/// Problems found in one document.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Component name (the document's file stem)
    pub name: String,
    pub path: PathBuf,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a single component document.
pub fn validate_document(path: &Path) -> ValidationReport {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let errors = match std::fs::read_to_string(path) {
        Err(e) => vec![format!("failed to read document: {}", e)],
        Ok(content) => match serde_json::from_str::<Value>(&content) {
            Err(e) => vec![format!("invalid JSON: {}", e)],
            Ok(value) => check_document(&value, &name),
        },
    };

    ValidationReport {
        name,
        path: path.to_path_buf(),
        errors,
    }
}

/// Validate every document in a registry, sorted by name.
pub fn validate_registry(registry: &FsRegistry) -> Result<Vec<ValidationReport>> {
    let reports = registry
        .component_names()?
        .iter()
        .map(|name| validate_document(&registry.document_path(name)))
        .collect();
    Ok(reports)
}

/// Check a parsed document. `stem` is the file name without extension.
fn check_document(doc: &Value, stem: &str) -> Vec<String> {
    let Some(obj) = doc.as_object() else {
        return vec!["document must be a JSON object".to_string()];
    };

    let mut errors: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !obj.contains_key(**field))
        .map(|field| format!("missing required field: {}", field))
        .collect();

    // Can't continue without required fields
    if !errors.is_empty() {
        return errors;
    }

    let name = obj["name"].as_str().unwrap_or_default();
    if let Err(e) = check_component_name(name) {
        errors.push(e);
    }
    if stem != name {
        errors.push(format!(
            "file name '{}' doesn't match component name '{}'",
            stem, name
        ));
    }

    let description = obj["description"].as_str().unwrap_or_default();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        errors.push(format!(
            "description exceeds {} characters",
            MAX_DESCRIPTION_LEN
        ));
    }

    let license = obj["license"].as_str().unwrap_or_default();
    if !VALID_LICENSES.contains(&license) {
        errors.push(format!(
            "unknown license '{}'; use an SPDX identifier",
            license
        ));
    }

    check_repository(&obj["repository"], &mut errors);

    let versions = obj["versions"].as_object();
    match versions {
        None => errors.push("versions must be an object".to_string()),
        Some(versions) if versions.is_empty() => {
            errors.push("at least one version is required".to_string())
        }
        Some(versions) => {
            for (label, info) in versions {
                check_version(label, info, &mut errors);
            }
        }
    }

    let default_version = obj["default_version"].as_str().unwrap_or_default();
    if !versions.is_some_and(|v| v.contains_key(default_version)) {
        errors.push(format!(
            "default_version '{}' not found in versions",
            default_version
        ));
    }

    if !obj["targets"].as_array().is_some_and(|t| !t.is_empty()) {
        errors.push("at least one target must be specified".to_string());
    }

    if !obj["maintainers"].as_array().is_some_and(|m| !m.is_empty()) {
        errors.push("at least one maintainer is required".to_string());
    }

    if let Some(deps) = obj.get("dependencies") {
        check_dependencies(deps, &mut errors);
    }

    errors
}

fn check_repository(repo: &Value, errors: &mut Vec<String>) {
    let kind = repo.get("type").and_then(Value::as_str);
    let url = repo.get("url").and_then(Value::as_str);

    let (Some(kind), Some(url)) = (kind, url) else {
        errors.push("repository must have 'type' and 'url' fields".to_string());
        return;
    };

    if !VALID_REPO_TYPES.contains(&kind) {
        errors.push(format!("invalid repository type: {}", kind));
    }
    if let Err(e) = url::Url::parse(url) {
        errors.push(format!("invalid repository url '{}': {}", url, e));
    }
}

fn check_version(label: &str, info: &Value, errors: &mut Vec<String>) {
    let Some(info) = info.as_object() else {
        errors.push(format!("version {} must be an object", label));
        return;
    };

    for field in REQUIRED_VERSION_FIELDS {
        if !info.contains_key(*field) {
            errors.push(format!("version {} missing required field: {}", label, field));
        }
    }

    if let Some(options) = info.get("cmake_options") {
        if !options.is_object() {
            errors.push(format!("version {}: cmake_options must be an object", label));
        }
    }
}

fn check_dependencies(deps: &Value, errors: &mut Vec<String>) {
    let Some(deps) = deps.as_array() else {
        errors.push("dependencies must be an array".to_string());
        return;
    };

    for dep in deps {
        if dep.get("name").and_then(Value::as_str).is_none() {
            errors.push("dependency missing 'name' field".to_string());
            continue;
        }
        if let Some(constraint) = dep.get("version_constraint").and_then(Value::as_str) {
            if let Err(e) = constraint.parse::<VersionConstraint>() {
                errors.push(format!("dependency {}: {}", dep["name"], e));
            }
        }
    }
}

/// Validate a component name.
///
/// Component names must be:
/// - Non-empty
/// - First character [a-z]
/// - Remaining characters [a-z0-9_]
pub fn check_component_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Err("component name cannot be empty".to_string()),
        Some(c) if !c.is_ascii_lowercase() => {
            return Err(format!(
                "invalid name '{}': must start with a lowercase letter",
                name
            ))
        }
        Some(_) => {}
    }

    if let Some(c) = chars.find(|c| !matches!(c, 'a'..='z' | '0'..='9' | '_')) {
        return Err(format!(
            "invalid name '{}': only [a-z0-9_] allowed, found '{}'",
            name, c
        ));
    }

    Ok(())
}
