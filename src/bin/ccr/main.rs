//! ccr CLI - build-time component activation for C and C++ projects

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ccr::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("ccr=debug")
    } else {
        EnvFilter::new("ccr=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.no_color)
        .with_target(false)
        .without_time()
        .init();

    let mut ctx = GlobalContext::new()?;
    ctx.set_color(!cli.no_color);
    let registry = cli.registry;

    // Execute command
    match cli.command {
        Commands::Activate(args) => commands::activate::execute(args, &ctx, registry),
        Commands::List(args) => commands::list::execute(args, &ctx, registry),
        Commands::Info(args) => commands::info::execute(args, &ctx, registry),
        Commands::Validate(args) => commands::validate::execute(args, &ctx, registry),
        Commands::Lock(args) => commands::lock::execute(args, &ctx),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
