//! High-level operations.
//!
//! This module contains the implementation of ccr commands.

pub mod activate;
pub mod inspect;
pub mod lockfile;

pub use activate::{activate, ActivateOptions, ActivateReport};
pub use inspect::{format_info, format_list, list_components, ComponentSummary};
pub use lockfile::{LockedComponent, LOCKFILE_HEADER};
