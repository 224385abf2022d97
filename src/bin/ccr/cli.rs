//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// ccr - build-time component activation for C and C++ projects
#[derive(Parser)]
#[command(name = "ccr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Registry root (the directory containing packages/)
    #[arg(long, global = true, env = "CCR_REGISTRY")]
    pub registry: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Activate components and their dependencies
    Activate(ActivateArgs),

    /// List registry components
    List(ListArgs),

    /// Show a component's registry entry
    Info(InfoArgs),

    /// Check registry documents for problems
    Validate(ValidateArgs),

    /// Show the components pinned by a lockfile
    Lock(LockArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ActivateArgs {
    /// Components to activate, as NAME or NAME@VERSION
    #[arg(required = true, value_name = "COMPONENT")]
    pub requests: Vec<String>,

    /// Build option override, applied to every requested component
    #[arg(short = 'D', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Do not activate declared dependencies
    #[arg(long)]
    pub no_deps: bool,

    /// Lockfile path
    #[arg(long, value_name = "PATH")]
    pub lockfile: Option<PathBuf>,

    /// Do not write a lockfile
    #[arg(long, conflicts_with = "lockfile")]
    pub no_lockfile: bool,

    /// Fetch delegate (cmake, git)
    #[arg(long)]
    pub delegate: Option<String>,

    /// Output path for the generated CMake script
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Checkout directory for the git delegate
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Attempt every request and report all failures
    #[arg(long)]
    pub keep_going: bool,
}

#[derive(Args)]
pub struct ListArgs {}

#[derive(Args)]
pub struct InfoArgs {
    /// Component name
    pub name: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Component to validate
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub name: Option<String>,

    /// Validate every registry document
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct LockArgs {
    /// Lockfile path (defaults to ccr.lock)
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
