//! `ccr activate` command

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

use ccr::core::BuildOptions;
use ccr::ops::{self, ActivateOptions};
use ccr::sources::DelegateKind;
use ccr::util::context::{DEFAULT_LOCKFILE, DEFAULT_SCRIPT};
use ccr::util::diagnostic::{emit, suggestions, Diagnostic};
use ccr::{ActivationRequest, GlobalContext};

use crate::cli::ActivateArgs;
use crate::commands::open_registry;

pub fn execute(args: ActivateArgs, ctx: &GlobalContext, registry: Option<PathBuf>) -> Result<()> {
    let config = ctx.load_config();
    let registry = open_registry(ctx, &config, registry);

    let overrides = BuildOptions::parse_overrides(&args.options)?;
    let requests = args
        .requests
        .iter()
        .map(|r| {
            r.parse::<ActivationRequest>().map(|req| {
                req.with_options(overrides.clone())
                    .skip_dependencies(args.no_deps)
            })
        })
        .collect::<Result<Vec<_>, String>>()
        .map_err(|e| anyhow!(e))?;

    // Flags override config, config overrides defaults
    let delegate = match args.delegate.as_deref() {
        Some(s) => s.parse::<DelegateKind>().map_err(|e| anyhow!(e))?,
        None => config.delegate()?.unwrap_or_default(),
    };

    let lockfile = if args.no_lockfile || !config.lockfile.enabled {
        None
    } else {
        let path = args
            .lockfile
            .or(config.lockfile.path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCKFILE));
        Some(ctx.resolve_path(&path))
    };

    let script = args
        .script
        .or(config.fetch.script)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT));

    let cache_dir = match args.cache_dir.or(config.fetch.cache_dir) {
        Some(dir) => ctx.resolve_path(&dir),
        None => ctx.default_cache_dir(),
    };

    let opts = ActivateOptions {
        requests,
        delegate,
        lockfile,
        script: ctx.resolve_path(&script),
        cache_dir,
        keep_going: args.keep_going,
    };

    tracing::debug!("Activating with the {} delegate", opts.delegate);

    let report = ops::activate(&registry, &opts).context("failed to write activation outputs")?;

    if !report.is_success() {
        for failure in &report.failures {
            emit(&failure.to_diagnostic(), ctx.color());
        }
        let count = report.failures.len();
        bail!(
            "could not activate {} request{}",
            count,
            if count == 1 { "" } else { "s" }
        );
    }

    println!("Activated {} components:", report.state.len());
    for record in report.state.iter() {
        println!("  {} {}", record.name, record.resolved_version);
    }

    for conflict in &report.conflicts {
        let diag = Diagnostic::warning(format!(
            "ignored request for `{}@{}`",
            conflict.name, conflict.requested
        ))
        .with_context(format!("`{}` is already active at {}", conflict.name, conflict.recorded))
        .with_suggestion(suggestions::VERSION_CONFLICT);
        emit(&diag, ctx.color());
    }

    for (name, path) in &report.checkouts {
        println!("  {} -> {}", name, path.display());
    }
    if let Some(path) = &report.script {
        println!("Script: {}", path.display());
    }
    if let Some(path) = &report.lockfile {
        println!("Lockfile: {}", path.display());
    }

    Ok(())
}
