//! The activation engine.
//!
//! An [`Activator`] owns the activation state for one configuration run. It
//! resolves each request against a [`MetadataStore`], activates declared
//! dependencies depth-first, composes build options and hands the result to a
//! [`FetchDelegate`]. A component is recorded only after its delegate call
//! succeeds, and every dependency is recorded before its dependent is
//! fetched.

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::core::constraint::parse_dotted_version;
use crate::core::{
    compose, ActivationRecord, ActivationState, BuildOptions, ComponentDescriptor,
    ConflictWarning, DependencySpec,
};
use crate::resolver::errors::ActivationError;
use crate::sources::{FetchDelegate, FetchRequest, MetadataStore};

/// A request to activate one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRequest {
    pub name: String,

    /// Version label; the component's default when `None`
    pub version: Option<String>,

    /// Options layered over the version's defaults
    pub options: BuildOptions,

    /// Do not activate declared dependencies
    pub skip_dependencies: bool,
}

impl ActivationRequest {
    pub fn new(name: impl Into<String>) -> Self {
        ActivationRequest {
            name: name.into(),
            version: None,
            options: BuildOptions::new(),
            skip_dependencies: false,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key, value);
        self
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn skip_dependencies(mut self, skip: bool) -> Self {
        self.skip_dependencies = skip;
        self
    }
}

/// Parses `name` or `name@version`.
impl FromStr for ActivationRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, version) = match s.split_once('@') {
            Some((name, version)) => (name, Some(version)),
            None => (s, None),
        };

        if name.is_empty() {
            return Err(format!("invalid request '{}': missing component name", s));
        }

        let mut request = ActivationRequest::new(name);
        if let Some(version) = version {
            if version.is_empty() {
                return Err(format!("invalid request '{}': empty version after '@'", s));
            }
            request = request.with_version(version);
        }
        Ok(request)
    }
}

impl fmt::Display for ActivationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => write!(f, "{}", self.name),
        }
    }
}

/// What an activation request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Newly activated at this version.
    Activated { version: String },
    /// Already active at this version; nothing was done.
    AlreadyActive { version: String },
    /// Already active at another version; the recorded one was kept.
    Conflict(ConflictWarning),
}

/// Activation engine for one configuration run.
pub struct Activator<S, D> {
    store: S,
    delegate: D,
    state: ActivationState,
    conflicts: Vec<ConflictWarning>,

    /// Components whose dependencies are being activated, outermost first,
    /// with their resolved versions
    in_progress: Vec<(String, String)>,
}

impl<S: MetadataStore, D: FetchDelegate> Activator<S, D> {
    /// Create an engine with empty activation state.
    pub fn new(store: S, delegate: D) -> Self {
        Activator {
            store,
            delegate,
            state: ActivationState::new(),
            conflicts: Vec::new(),
            in_progress: Vec::new(),
        }
    }

    /// Activation state so far.
    pub fn state(&self) -> &ActivationState {
        &self.state
    }

    /// Conflict warnings raised so far, in order.
    pub fn conflicts(&self) -> &[ConflictWarning] {
        &self.conflicts
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// Consume the engine, returning the delegate and the final state.
    pub fn finish(self) -> (D, ActivationState, Vec<ConflictWarning>) {
        (self.delegate, self.state, self.conflicts)
    }

    /// Activate a component and, unless skipped, its dependencies.
    ///
    /// Stops at the first fatal error. Components activated before the
    /// error stay recorded.
    pub fn activate(&mut self, request: &ActivationRequest) -> Result<Outcome, ActivationError> {
        self.in_progress.clear();
        self.activate_inner(request)
    }

    /// Activate independent requests, continuing past failures.
    ///
    /// Each request is attempted in order against the shared state. Returns
    /// one result per request.
    pub fn activate_all<'r, I>(&mut self, requests: I) -> Vec<Result<Outcome, ActivationError>>
    where
        I: IntoIterator<Item = &'r ActivationRequest>,
    {
        requests
            .into_iter()
            .map(|request| {
                let result = self.activate(request);
                if let Err(e) = &result {
                    tracing::debug!("Activation of {} failed: {}", request, e);
                }
                result
            })
            .collect()
    }

    fn activate_inner(&mut self, request: &ActivationRequest) -> Result<Outcome, ActivationError> {
        let name = request.name.as_str();

        if let Some(record) = self.state.get(name) {
            let recorded = record.resolved_version.clone();
            return Ok(match &request.version {
                Some(requested) if *requested != recorded => {
                    let warning = ConflictWarning {
                        name: name.to_string(),
                        recorded,
                        requested: requested.clone(),
                    };
                    tracing::warn!("{}", warning);
                    self.conflicts.push(warning.clone());
                    Outcome::Conflict(warning)
                }
                _ => Outcome::AlreadyActive { version: recorded },
            });
        }

        if let Some(pos) = self.in_progress.iter().position(|(n, _)| n == name) {
            let version = Some(self.in_progress[pos].1.clone());
            let mut chain: Vec<String> =
                self.in_progress[pos..].iter().map(|(n, _)| n.clone()).collect();
            chain.push(name.to_string());
            return Err(ActivationError::CycleDetected { chain, version });
        }

        let descriptor = self
            .store
            .lookup(name)
            .map_err(|e| e.with_requested_version(request.version.as_deref()))?;
        let version = request
            .version
            .clone()
            .unwrap_or_else(|| descriptor.default_version.clone());
        let version_desc = self
            .store
            .lookup_version(name, &version)
            .map_err(|e| e.with_requested_version(Some(version.as_str())))?;

        tracing::debug!("Resolved {} to {} ({})", name, version, version_desc.revision);

        if !request.skip_dependencies {
            self.in_progress.push((name.to_string(), version.clone()));
            let deps = self.activate_dependencies(&descriptor);
            self.in_progress.pop();
            deps?;
        }

        let fetch = FetchRequest {
            name: name.to_string(),
            version: version.clone(),
            repository: descriptor.repository.url.clone(),
            revision: version_desc.revision.clone(),
            options: compose(&version_desc.build_options, &request.options),
        };

        self.delegate
            .fetch(&fetch)
            .map_err(|e| ActivationError::FetchFailed {
                name: name.to_string(),
                version: version.clone(),
                source: e.into(),
            })?;

        self.state.record(ActivationRecord::new(name, version.clone()));
        tracing::info!("Activated {} {}", name, version);

        Ok(Outcome::Activated { version })
    }

    fn activate_dependencies(
        &mut self,
        descriptor: &ComponentDescriptor,
    ) -> Result<(), ActivationError> {
        for dep in &descriptor.dependencies {
            self.activate_inner(&ActivationRequest::new(dep.name.as_str()))?;
            self.note_constraint(&descriptor.name, dep);
        }
        Ok(())
    }

    /// Constraints never pick or reject a version. Log when one is unmet.
    fn note_constraint(&self, dependent: &str, dep: &DependencySpec) {
        let Some(constraint) = &dep.version_constraint else {
            return;
        };
        let Some(resolved) = self.state.version_of(&dep.name) else {
            return;
        };
        let satisfied = parse_dotted_version(resolved)
            .or_else(|| Version::parse(resolved).ok())
            .map(|v| constraint.matches(&v));

        if satisfied == Some(false) {
            tracing::debug!(
                "{} declares {} {}, active version {} does not match (constraint not enforced)",
                dependent,
                dep.name,
                constraint,
                resolved
            );
        }
    }
}
