//! Core data structures for ccr.
//!
//! This module contains the foundational types used throughout ccr:
//! - Registry metadata (component and version descriptors)
//! - Version constraints
//! - Build options and their composition
//! - Activation state

pub mod activation;
pub mod constraint;
pub mod descriptor;
pub mod options;

pub use activation::{ActivationRecord, ActivationState, ConflictWarning};
pub use constraint::{ConstraintOp, VersionConstraint};
pub use descriptor::{ComponentDescriptor, DependencySpec, Repository, VersionDescriptor};
pub use options::{compose, BuildOptions};
