//! CMake delegate - hands components to the build through `FetchContent`.
//!
//! Each fetch appends a block to a script that the consuming project
//! `include()`s:
//!
//! ```cmake
//! set(SPDLOG_FMT_EXTERNAL "ON" CACHE STRING "" FORCE)
//! FetchContent_Declare(
//!   spdlog
//!   GIT_REPOSITORY https://github.com/gabime/spdlog
//!   GIT_TAG v1.12.0
//!   GIT_SHALLOW TRUE
//! )
//! FetchContent_MakeAvailable(spdlog)
//! ```
//!
//! Blocks are written in fetch order, so dependencies come before the
//! components that use them.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Result};

use crate::sources::{FetchDelegate, FetchRequest};
use crate::util::fs::write_string;

const SCRIPT_HEADER: &str = "\
# Generated by ccr. Do not edit.
cmake_minimum_required(VERSION 3.14)
include(FetchContent)
";

/// Builds a CMake script declaring every fetched component.
#[derive(Debug, Clone)]
pub struct CmakeScriptDelegate {
    script: String,
    declared: Vec<String>,
}

impl CmakeScriptDelegate {
    pub fn new() -> Self {
        CmakeScriptDelegate {
            script: SCRIPT_HEADER.to_string(),
            declared: Vec::new(),
        }
    }

    /// The script generated so far.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Components declared, in order.
    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    /// Write the script to disk.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_string(path, &self.script)
    }
}

impl Default for CmakeScriptDelegate {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchDelegate for CmakeScriptDelegate {
    fn fetch(&mut self, request: &FetchRequest) -> Result<()> {
        if !is_cmake_identifier(&request.name) {
            bail!("`{}` is not a valid FetchContent name", request.name);
        }
        for key in request.options.keys() {
            if !is_cmake_identifier(key) {
                bail!("build option `{}` is not a valid CMake variable name", key);
            }
        }
        if request.repository.is_empty() || !is_unquoted_argument(&request.repository) {
            bail!(
                "repository URL `{}` cannot be written as a CMake argument",
                request.repository
            );
        }
        if request.revision.is_empty() || !is_unquoted_argument(&request.revision) {
            bail!(
                "revision `{}` of `{}` cannot be written as a CMake argument",
                request.revision.escape_debug(),
                request.name
            );
        }

        let mut block = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(block, "\n# {} {}", request.name, request.version);
        for (key, value) in request.options.iter() {
            let _ = writeln!(
                block,
                "set({} \"{}\" CACHE STRING \"\" FORCE)",
                key,
                escape(value)
            );
        }
        let _ = writeln!(block, "FetchContent_Declare(");
        let _ = writeln!(block, "  {}", request.name);
        let _ = writeln!(block, "  GIT_REPOSITORY {}", request.repository);
        let _ = writeln!(block, "  GIT_TAG {}", request.revision);
        // Shallow clones can only check out refs, not arbitrary commits
        if !is_commit_id(&request.revision) {
            let _ = writeln!(block, "  GIT_SHALLOW TRUE");
        }
        let _ = writeln!(block, ")");
        let _ = writeln!(block, "FetchContent_MakeAvailable({})", request.name);

        self.script.push_str(&block);
        self.declared.push(request.name.clone());

        tracing::debug!("Declared {} {} for FetchContent", request.name, request.version);
        Ok(())
    }
}

fn is_cmake_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

fn is_commit_id(rev: &str) -> bool {
    (7..=40).contains(&rev.len()) && rev.chars().all(|c| c.is_ascii_hexdigit())
}

/// Whether `s` survives as a single unquoted CMake argument, unexpanded.
fn is_unquoted_argument(s: &str) -> bool {
    !s.chars().any(|c| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '(' | ')' | '"' | '#' | ';' | '$' | '\\')
    })
}

/// Escape a value for a quoted CMake argument. `$` and `;` are escaped so
/// the value is neither expanded nor split into a list.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '"' | '$' | ';' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
