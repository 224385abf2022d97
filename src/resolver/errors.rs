//! Activation error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Boxed error reported by a fetch delegate.
pub type DelegateError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal error during activation.
///
/// Any of these aborts the current activation request. Components activated
/// before the failure stay recorded.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ActivationError {
    #[error("component `{}` not found in registry", qualified(name, version))]
    #[diagnostic(code(ccr::activate::not_found))]
    NotFound {
        name: String,
        /// Version that was requested, if one was named
        version: Option<String>,
    },

    #[error("version `{version}` of `{name}` not found in registry")]
    #[diagnostic(code(ccr::activate::version_not_found))]
    VersionNotFound {
        name: String,
        version: String,
        available: Vec<String>,
    },

    #[error("malformed metadata for `{}`: {reason}", qualified(name, version))]
    #[diagnostic(
        code(ccr::registry::malformed),
        help("run `ccr validate {name}` to list every problem in the document")
    )]
    MalformedMetadata {
        name: String,
        version: Option<String>,
        path: PathBuf,
        reason: String,
    },

    #[error(
        "dependency cycle detected at `{}`: {}",
        qualified(chain.last().map(String::as_str).unwrap_or_default(), version),
        chain.join(" -> ")
    )]
    #[diagnostic(code(ccr::activate::cycle))]
    CycleDetected {
        chain: Vec<String>,
        /// Resolved version of the component that closes the cycle
        version: Option<String>,
    },

    #[error("failed to fetch `{name}` {version}")]
    #[diagnostic(code(ccr::fetch::failed))]
    FetchFailed {
        name: String,
        version: String,
        #[source]
        source: DelegateError,
    },
}

impl ActivationError {
    /// Attach the requested version to a lookup error that has none.
    pub fn with_requested_version(mut self, requested: Option<&str>) -> Self {
        if let ActivationError::NotFound { version, .. }
        | ActivationError::MalformedMetadata { version, .. } = &mut self
        {
            if version.is_none() {
                *version = requested.map(str::to_string);
            }
        }
        self
    }

    /// Name of the component the error is about.
    pub fn component(&self) -> &str {
        match self {
            ActivationError::NotFound { name, .. }
            | ActivationError::VersionNotFound { name, .. }
            | ActivationError::MalformedMetadata { name, .. }
            | ActivationError::FetchFailed { name, .. } => name.as_str(),
            ActivationError::CycleDetected { chain, .. } => {
                chain.last().map(String::as_str).unwrap_or_default()
            }
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ActivationError::NotFound { name, version } => {
                Diagnostic::error(format!(
                    "could not find component `{}`",
                    qualified(name, version)
                ))
                    .with_suggestion("Check that the component name is spelled correctly")
                    .with_suggestion(suggestions::COMPONENT_NOT_FOUND)
            }

            ActivationError::VersionNotFound {
                name,
                version,
                available,
            } => {
                let mut diag = Diagnostic::error(format!(
                    "no version `{}` of component `{}`",
                    version, name
                ));

                if !available.is_empty() {
                    diag = diag.with_context(format!(
                        "available versions: {}",
                        available.join(", ")
                    ));
                }

                diag.with_suggestion(format!("Request one of the listed versions of `{}`", name))
                    .with_suggestion(suggestions::VERSION_NOT_FOUND)
            }

            ActivationError::MalformedMetadata {
                name,
                version,
                path,
                reason,
            } => {
                Diagnostic::error(format!(
                    "malformed registry document for `{}`",
                    qualified(name, version)
                ))
                    .with_location(path)
                    .with_context(reason.clone())
                    .with_suggestion(suggestions::MALFORMED_METADATA)
            }

            ActivationError::CycleDetected { chain, version } => {
                let closing = chain.last().map(String::as_str).unwrap_or_default();
                Diagnostic::error(format!(
                    "cycle detected in component dependencies at `{}`",
                    qualified(closing, version)
                ))
                    .with_context(format!("cycle: {}", chain.join(" -> ")))
                    .with_suggestion(
                        "Break the cycle by removing a dependency declaration".to_string(),
                    )
            }

            ActivationError::FetchFailed {
                name,
                version,
                source,
            } => Diagnostic::error(format!("failed to fetch `{}` {}", name, version))
                .with_context(format!("caused by: {}", source))
                .with_suggestion(suggestions::FETCH_FAILED),
        }
    }
}

/// `name@version`, or just `name` when no version is known.
fn qualified(name: &str, version: &Option<String>) -> String {
    match version {
        Some(v) => format!("{}@{}", name, v),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_not_found_diagnostic() {
        let err = ActivationError::VersionNotFound {
            name: "fmt".to_string(),
            version: "99.0.0".to_string(),
            available: vec!["10.1.0".to_string(), "9.1.0".to_string()],
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("no version `99.0.0` of component `fmt`"));
        assert!(output.contains("available versions: 10.1.0, 9.1.0"));
    }

    #[test]
    fn test_cycle_diagnostic() {
        let err = ActivationError::CycleDetected {
            chain: vec!["a".to_string(), "b".to_string(), "a".to_string()],
            version: Some("1.0.0".to_string()),
        };

        assert_eq!(
            err.to_string(),
            "dependency cycle detected at `a@1.0.0`: a -> b -> a"
        );
        assert_eq!(err.component(), "a");
        assert!(err.to_diagnostic().format(false).contains("cycle: a -> b -> a"));
    }

    #[test]
    fn test_not_found_names_requested_version() {
        let err = ActivationError::NotFound {
            name: "boost".to_string(),
            version: None,
        }
        .with_requested_version(Some("1.83.0"));

        assert_eq!(
            err.to_string(),
            "component `boost@1.83.0` not found in registry"
        );
        assert!(err
            .to_diagnostic()
            .format(false)
            .contains("could not find component `boost@1.83.0`"));
    }

    #[test]
    fn test_requested_version_does_not_replace_known_one() {
        let err = ActivationError::MalformedMetadata {
            name: "fmt".to_string(),
            version: Some("10.1.0".to_string()),
            path: PathBuf::from("fmt.json"),
            reason: "bad".to_string(),
        }
        .with_requested_version(Some("9.1.0"));

        assert_eq!(err.to_string(), "malformed metadata for `fmt@10.1.0`: bad");
    }

    #[test]
    fn test_fetch_failure_keeps_source() {
        let err = ActivationError::FetchFailed {
            name: "zlib".to_string(),
            version: "1.3.1".to_string(),
            source: anyhow::anyhow!("connection refused").into(),
        };

        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "connection refused");
        assert!(err.to_diagnostic().format(false).contains("caused by: connection refused"));
    }
}
