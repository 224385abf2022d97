//! `ccr validate` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use ccr::sources::registry::{validate_document, validate_registry, ValidationReport};
use ccr::GlobalContext;

use crate::cli::ValidateArgs;
use crate::commands::open_registry;

pub fn execute(args: ValidateArgs, ctx: &GlobalContext, registry: Option<PathBuf>) -> Result<()> {
    let config = ctx.load_config();
    let registry = open_registry(ctx, &config, registry);

    let reports = match &args.name {
        Some(name) => {
            let path = registry.document_path(name);
            if !path.exists() {
                bail!("no registry document for `{}` at {}", name, path.display());
            }
            vec![validate_document(&path)]
        }
        None => validate_registry(&registry)?,
    };

    let failed = reports.iter().filter(|r| !r.is_valid()).count();
    for report in &reports {
        print_report(report);
    }

    if failed > 0 {
        bail!(
            "{} of {} document{} failed validation",
            failed,
            reports.len(),
            if reports.len() == 1 { "" } else { "s" }
        );
    }

    println!(
        "\n{} document{} valid",
        reports.len(),
        if reports.len() == 1 { "" } else { "s" }
    );
    Ok(())
}

fn print_report(report: &ValidationReport) {
    if report.is_valid() {
        println!("[OK] {}", report.name);
        return;
    }

    println!("[!!] {} ({})", report.name, report.path.display());
    for error in &report.errors {
        println!("     {}", error);
    }
}
