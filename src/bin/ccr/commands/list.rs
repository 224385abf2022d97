//! `ccr list` command

use std::path::PathBuf;

use anyhow::Result;

use ccr::ops::{format_list, list_components};
use ccr::GlobalContext;

use crate::cli::ListArgs;
use crate::commands::open_registry;

pub fn execute(_args: ListArgs, ctx: &GlobalContext, registry: Option<PathBuf>) -> Result<()> {
    let config = ctx.load_config();
    let registry = open_registry(ctx, &config, registry);

    let summaries = list_components(&registry)?;
    if summaries.is_empty() {
        println!("No components in {}", registry.root().display());
        return Ok(());
    }

    print!("{}", format_list(&summaries));
    Ok(())
}
