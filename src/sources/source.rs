//! Traits at the edges of the activation engine.
//!
//! [`MetadataStore`] is where component metadata comes from.
//! [`FetchDelegate`] is what makes a resolved component available to the
//! consuming build.

use std::fmt;
use std::str::FromStr;

use crate::core::{BuildOptions, ComponentDescriptor, VersionDescriptor};
use crate::resolver::ActivationError;

/// Read-only access to component metadata.
///
/// Implementations must not cache between calls: two lookups against the
/// same storage state return the same result.
pub trait MetadataStore {
    /// Load a component's descriptor.
    fn lookup(&self, name: &str) -> Result<ComponentDescriptor, ActivationError>;

    /// Load one version of a component.
    fn lookup_version(&self, name: &str, version: &str)
        -> Result<VersionDescriptor, ActivationError>;
}

impl<S: MetadataStore + ?Sized> MetadataStore for &S {
    fn lookup(&self, name: &str) -> Result<ComponentDescriptor, ActivationError> {
        (**self).lookup(name)
    }

    fn lookup_version(
        &self,
        name: &str,
        version: &str,
    ) -> Result<VersionDescriptor, ActivationError> {
        (**self).lookup_version(name, version)
    }
}

/// Everything a delegate needs to bring one component into the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub name: String,

    /// Resolved version label
    pub version: String,

    /// Repository URL
    pub repository: String,

    /// Tag or commit to check out
    pub revision: String,

    /// Composed build options
    pub options: BuildOptions,
}

/// Acquires a component's sources and attaches them to the build graph.
///
/// Retries and cleanup are the delegate's business; the engine treats any
/// error as fatal.
pub trait FetchDelegate {
    fn fetch(&mut self, request: &FetchRequest) -> anyhow::Result<()>;
}

impl<D: FetchDelegate + ?Sized> FetchDelegate for &mut D {
    fn fetch(&mut self, request: &FetchRequest) -> anyhow::Result<()> {
        (**self).fetch(request)
    }
}

/// Which delegate the CLI drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DelegateKind {
    /// Emit a CMake `FetchContent` script
    #[default]
    Cmake,
    /// Check sources out into a local cache with git
    Git,
}

impl FromStr for DelegateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cmake" => Ok(DelegateKind::Cmake),
            "git" => Ok(DelegateKind::Git),
            _ => Err(format!(
                "invalid delegate '{}'; expected 'cmake' or 'git'",
                s
            )),
        }
    }
}

impl fmt::Display for DelegateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelegateKind::Cmake => write!(f, "cmake"),
            DelegateKind::Git => write!(f, "git"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delegate_kind_parse() {
        assert_eq!("cmake".parse::<DelegateKind>(), Ok(DelegateKind::Cmake));
        assert_eq!("GIT".parse::<DelegateKind>(), Ok(DelegateKind::Git));
        assert!("svn".parse::<DelegateKind>().is_err());
        assert_eq!(DelegateKind::default().to_string(), "cmake");
    }
}
