//! Metadata sources and fetch delegates.
//!
//! The registry supplies component metadata; delegates take a resolved
//! component and make it available to the consuming build.

pub mod cmake;
pub mod git;
pub mod registry;
pub mod source;

pub use cmake::CmakeScriptDelegate;
pub use git::GitDelegate;
pub use registry::FsRegistry;
pub use source::{DelegateKind, FetchDelegate, FetchRequest, MetadataStore};
