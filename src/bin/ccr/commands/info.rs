//! `ccr info` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use ccr::ops::format_info;
use ccr::util::diagnostic::emit;
use ccr::{GlobalContext, MetadataStore};

use crate::cli::InfoArgs;
use crate::commands::open_registry;

pub fn execute(args: InfoArgs, ctx: &GlobalContext, registry: Option<PathBuf>) -> Result<()> {
    let config = ctx.load_config();
    let registry = open_registry(ctx, &config, registry);

    match registry.lookup(&args.name) {
        Ok(descriptor) => {
            print!("{}", format_info(&descriptor));
            Ok(())
        }
        Err(e) => {
            emit(&e.to_diagnostic(), ctx.color());
            bail!("{}", e)
        }
    }
}
