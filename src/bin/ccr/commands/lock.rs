//! `ccr lock` command

use std::path::PathBuf;

use anyhow::Result;

use ccr::ops::lockfile;
use ccr::util::context::DEFAULT_LOCKFILE;
use ccr::GlobalContext;

use crate::cli::LockArgs;

pub fn execute(args: LockArgs, ctx: &GlobalContext) -> Result<()> {
    let path = match args.path {
        Some(path) => ctx.resolve_path(&path),
        None => {
            let config = ctx.load_config();
            let path = config
                .lockfile
                .path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCKFILE));
            ctx.resolve_path(&path)
        }
    };

    let entries = lockfile::load(&path)?;
    if entries.is_empty() {
        println!("{} pins no components", path.display());
        return Ok(());
    }

    for entry in &entries {
        println!("{} {}", entry.name, entry.version);
    }
    Ok(())
}
