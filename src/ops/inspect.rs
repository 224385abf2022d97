//! Read-only registry introspection.
//!
//! Backs `ccr list` and `ccr info`. Nothing here touches activation state.

use anyhow::Result;

use crate::core::ComponentDescriptor;
use crate::sources::{FsRegistry, MetadataStore};

/// One line of `ccr list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSummary {
    pub name: String,
    pub default_version: String,
    pub description: String,
}

/// Summaries of every registry component, sorted by name.
pub fn list_components(registry: &FsRegistry) -> Result<Vec<ComponentSummary>> {
    let mut summaries = Vec::new();

    for name in registry.component_names()? {
        let descriptor = registry.lookup(&name)?;
        summaries.push(ComponentSummary {
            name: descriptor.name,
            default_version: descriptor.default_version,
            description: descriptor.description,
        });
    }

    Ok(summaries)
}

/// Format summaries as aligned columns.
pub fn format_list(summaries: &[ComponentSummary]) -> String {
    let name_width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let version_width = summaries
        .iter()
        .map(|s| s.default_version.len())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for s in summaries {
        let line = format!(
            "{:<nw$}  {:<vw$}  {}",
            s.name,
            s.default_version,
            s.description,
            nw = name_width,
            vw = version_width
        );
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

/// Format every descriptor field for `ccr info`.
pub fn format_info(descriptor: &ComponentDescriptor) -> String {
    let mut output = String::new();
    let mut field = |label: &str, value: &str| {
        output.push_str(&format!("{:<13} {}\n", format!("{}:", label), value));
    };

    field("name", &descriptor.name);
    field("description", &descriptor.description);
    field("homepage", &descriptor.homepage);
    field("license", &descriptor.license);
    match &descriptor.repository.kind {
        Some(kind) => field("repository", &format!("{} ({})", descriptor.repository.url, kind)),
        None => field("repository", &descriptor.repository.url),
    }
    field("default", &descriptor.default_version);
    field("targets", &descriptor.targets.join(", "));
    field("maintainers", &descriptor.maintainers.join(", "));

    output.push_str("\nversions:\n");
    for (label, version) in &descriptor.versions {
        let marker = if *label == descriptor.default_version {
            " (default)"
        } else {
            ""
        };
        let tested = if version.tested { "" } else { " [untested]" };
        output.push_str(&format!(
            "  {}{}: {}{}\n",
            label, marker, version.revision, tested
        ));

        if let Some(min) = &version.minimum_host_version {
            output.push_str(&format!("    minimum host version: {}\n", min));
        }
        if !version.build_options.is_empty() {
            output.push_str(&format!("    options: {}\n", version.build_options));
        }
        for patch in &version.patches {
            output.push_str(&format!("    patch: {}\n", patch));
        }
        if let Some(notes) = &version.notes {
            output.push_str(&format!("    notes: {}\n", notes));
        }
    }

    if !descriptor.dependencies.is_empty() {
        output.push_str("\ndependencies:\n");
        for dep in &descriptor.dependencies {
            let mut line = format!("  {}", dep.name);
            if let Some(constraint) = &dep.version_constraint {
                line.push_str(&format!(" {}", constraint));
            }
            if dep.optional {
                line.push_str(" (optional)");
            }
            output.push_str(&line);
            output.push('\n');
        }
    }

    output
}
