//! Test utilities for ccr unit tests.
//!
//! Provides a temporary on-disk registry and a fetch delegate that records
//! calls instead of fetching anything.

pub mod fixtures;

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::sources::{FetchDelegate, FetchRequest};

pub use fixtures::*;

/// Delegate that records each fetch and can be told to fail for a name.
#[derive(Debug, Default)]
pub struct RecordingDelegate {
    calls: Vec<FetchRequest>,
    fail_on: HashSet<String>,
}

impl RecordingDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail whenever the named component is fetched.
    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on.insert(name.to_string());
        self
    }

    /// Every successful fetch, in order.
    pub fn calls(&self) -> &[FetchRequest] {
        &self.calls
    }

    /// Names fetched, in order.
    pub fn names(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.name.as_str()).collect()
    }
}

impl FetchDelegate for RecordingDelegate {
    fn fetch(&mut self, request: &FetchRequest) -> Result<()> {
        if self.fail_on.contains(&request.name) {
            bail!("simulated fetch failure for {}", request.name);
        }
        self.calls.push(request.clone());
        Ok(())
    }
}
