//! Component activation.
//!
//! Walks a requested component's dependencies depth-first, recording each
//! component once and handing it to a fetch delegate.

pub mod activate;
pub mod errors;

pub use activate::{ActivationRequest, Activator, Outcome};
pub use errors::{ActivationError, DelegateError};
