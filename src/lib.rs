//! ccr - build-time component activation for C and C++ projects
//!
//! This crate resolves components against a JSON metadata registry,
//! activates their dependencies depth-first, composes build options and
//! hands each component to a fetch delegate. The resulting activation
//! state can be pinned in a lockfile.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities for ccr unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides an on-disk registry fixture and a recording fetch delegate.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{ActivationState, BuildOptions, ComponentDescriptor};

pub use resolver::{ActivationError, ActivationRequest, Activator};
pub use sources::{FetchDelegate, FsRegistry, MetadataStore};
pub use util::context::GlobalContext;
