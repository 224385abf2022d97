//! Implementation of `ccr activate`.
//!
//! Runs the activation engine over a set of requests with the selected fetch
//! delegate, then writes the delegate's output and the lockfile. Nothing is
//! written unless every request succeeds.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::{ActivationState, ConflictWarning};
use crate::ops::lockfile;
use crate::resolver::{ActivationError, ActivationRequest, Activator};
use crate::sources::{CmakeScriptDelegate, DelegateKind, FetchDelegate, FsRegistry, GitDelegate};

/// Options for an activation run.
#[derive(Debug, Clone)]
pub struct ActivateOptions {
    /// Top-level requests, in order
    pub requests: Vec<ActivationRequest>,

    /// Delegate that makes components available
    pub delegate: DelegateKind,

    /// Lockfile destination; `None` disables the lockfile
    pub lockfile: Option<PathBuf>,

    /// Output path for the CMake script
    pub script: PathBuf,

    /// Checkout root for the git delegate
    pub cache_dir: PathBuf,

    /// Attempt every request instead of stopping at the first failure
    pub keep_going: bool,
}

/// What an activation run did.
#[derive(Debug)]
pub struct ActivateReport {
    /// Final activation state
    pub state: ActivationState,

    /// Conflicting requests that were ignored
    pub conflicts: Vec<ConflictWarning>,

    /// Failed requests
    pub failures: Vec<ActivationError>,

    /// Lockfile written, if any
    pub lockfile: Option<PathBuf>,

    /// Delegate output written, if any
    pub script: Option<PathBuf>,

    /// Git checkouts by component name
    pub checkouts: Vec<(String, PathBuf)>,
}

impl ActivateReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Activate the requested components.
///
/// Activation errors are collected in the report. The returned `Err` is
/// reserved for failures writing outputs.
pub fn activate(registry: &FsRegistry, opts: &ActivateOptions) -> Result<ActivateReport> {
    let mut report = match opts.delegate {
        DelegateKind::Cmake => {
            let (delegate, mut report) = run(registry, CmakeScriptDelegate::new(), opts);
            if report.is_success() {
                delegate.write_to(&opts.script)?;
                tracing::info!(
                    "Wrote {} declarations to {}",
                    delegate.declared().len(),
                    opts.script.display()
                );
                report.script = Some(opts.script.clone());
            }
            report
        }
        DelegateKind::Git => {
            let (delegate, mut report) =
                run(registry, GitDelegate::new(&opts.cache_dir), opts);
            report.checkouts = delegate
                .checkouts()
                .iter()
                .map(|(name, path)| (name.clone(), path.clone()))
                .collect();
            report
        }
    };

    if report.is_success() {
        if let Some(path) = &opts.lockfile {
            lockfile::generate(&report.state, path)?;
            report.lockfile = Some(path.clone());
        }
    }

    Ok(report)
}

fn run<D: FetchDelegate>(
    registry: &FsRegistry,
    delegate: D,
    opts: &ActivateOptions,
) -> (D, ActivateReport) {
    let mut activator = Activator::new(registry, delegate);
    let mut failures = Vec::new();

    if opts.keep_going {
        failures.extend(
            activator
                .activate_all(&opts.requests)
                .into_iter()
                .filter_map(Result::err),
        );
    } else {
        for request in &opts.requests {
            if let Err(e) = activator.activate(request) {
                failures.push(e);
                break;
            }
        }
    }

    let (delegate, state, conflicts) = activator.finish();
    let report = ActivateReport {
        state,
        conflicts,
        failures,
        lockfile: None,
        script: None,
        checkouts: Vec::new(),
    };
    (delegate, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RegistryFixture;
    use tempfile::TempDir;

    fn options(tmp: &TempDir, requests: &[&str]) -> ActivateOptions {
        ActivateOptions {
            requests: requests.iter().map(|r| r.parse().unwrap()).collect(),
            delegate: DelegateKind::Cmake,
            lockfile: Some(tmp.path().join("ccr.lock")),
            script: tmp.path().join("ccr-deps.cmake"),
            cache_dir: tmp.path().join("cache"),
            keep_going: false,
        }
    }

    #[test]
    fn test_activate_writes_outputs() {
        let fixture = RegistryFixture::fmt_spdlog();
        let tmp = TempDir::new().unwrap();
        let opts = options(&tmp, &["spdlog"]);

        let report = activate(&fixture.registry(), &opts).unwrap();
        assert!(report.is_success());
        assert_eq!(report.state.len(), 2);

        let lock = lockfile::load(&tmp.path().join("ccr.lock")).unwrap();
        let names: Vec<_> = lock.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["fmt", "spdlog"]);

        let script = std::fs::read_to_string(tmp.path().join("ccr-deps.cmake")).unwrap();
        let fmt_at = script.find("FetchContent_Declare(\n  fmt").unwrap();
        let spdlog_at = script.find("FetchContent_Declare(\n  spdlog").unwrap();
        assert!(fmt_at < spdlog_at);
    }

    #[test]
    fn test_failure_writes_nothing() {
        let fixture = RegistryFixture::fmt_spdlog();
        let tmp = TempDir::new().unwrap();
        let opts = options(&tmp, &["fmt", "boost", "spdlog"]);

        let report = activate(&fixture.registry(), &opts).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].component(), "boost");
        // stops at the first failure
        assert!(!report.state.contains("spdlog"));
        assert!(report.lockfile.is_none());
        assert!(!tmp.path().join("ccr.lock").exists());
        assert!(!tmp.path().join("ccr-deps.cmake").exists());
    }

    #[test]
    fn test_keep_going_collects_every_failure() {
        let fixture = RegistryFixture::fmt_spdlog();
        let tmp = TempDir::new().unwrap();
        let mut opts = options(&tmp, &["boost", "spdlog", "zlib"]);
        opts.keep_going = true;

        let report = activate(&fixture.registry(), &opts).unwrap();
        let failed: Vec<_> = report.failures.iter().map(|e| e.component()).collect();
        assert_eq!(failed, vec!["boost", "zlib"]);
        assert!(report.state.contains("spdlog"));
        assert!(!tmp.path().join("ccr.lock").exists());
    }

    #[test]
    fn test_lockfile_disabled() {
        let fixture = RegistryFixture::fmt_spdlog();
        let tmp = TempDir::new().unwrap();
        let mut opts = options(&tmp, &["fmt"]);
        opts.lockfile = None;

        let report = activate(&fixture.registry(), &opts).unwrap();
        assert!(report.is_success());
        assert!(report.lockfile.is_none());
        assert!(!tmp.path().join("ccr.lock").exists());
        assert!(report.script.is_some());
    }

    #[test]
    fn test_conflicts_reported() {
        let fixture = RegistryFixture::fmt_spdlog();
        let tmp = TempDir::new().unwrap();
        let opts = options(&tmp, &["fmt@9.1.0", "fmt@10.1.0"]);

        let report = activate(&fixture.registry(), &opts).unwrap();
        assert!(report.is_success());
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.state.version_of("fmt"), Some("9.1.0"));
    }
}
