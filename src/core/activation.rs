//! Run-scoped record of activated components.

use std::fmt;

use indexmap::IndexMap;

/// A component that has been activated at a resolved version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRecord {
    pub name: String,
    pub resolved_version: String,
}

impl ActivationRecord {
    pub fn new(name: impl Into<String>, resolved_version: impl Into<String>) -> Self {
        ActivationRecord {
            name: name.into(),
            resolved_version: resolved_version.into(),
        }
    }
}

impl fmt::Display for ActivationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.resolved_version)
    }
}

/// Which components are active, and at which version.
///
/// Entries are only ever added. Once a name is recorded its version never
/// changes for the rest of the run.
#[derive(Debug, Clone, Default)]
pub struct ActivationState {
    records: IndexMap<String, ActivationRecord>,
}

impl ActivationState {
    pub fn new() -> Self {
        ActivationState::default()
    }

    /// Record an activation.
    ///
    /// Returns `false` and leaves the state untouched if the name is already
    /// recorded.
    pub fn record(&mut self, record: ActivationRecord) -> bool {
        if self.records.contains_key(&record.name) {
            return false;
        }
        self.records.insert(record.name.clone(), record);
        true
    }

    pub fn get(&self, name: &str) -> Option<&ActivationRecord> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Resolved version of a component, if active.
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.get(name).map(|r| r.resolved_version.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in activation order.
    pub fn iter(&self) -> impl Iterator<Item = &ActivationRecord> {
        self.records.values()
    }

    /// Records sorted by name.
    pub fn sorted(&self) -> Vec<&ActivationRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }
}

/// Raised when an already-active component is requested at another version.
///
/// Not an error: the recorded version stays and the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictWarning {
    pub name: String,
    pub recorded: String,
    pub requested: String,
}

impl fmt::Display for ConflictWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is already active at {}; ignoring request for {}",
            self.name, self.recorded, self.requested
        )
    }
}
