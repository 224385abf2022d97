//! Command implementations

use std::path::PathBuf;

use ccr::sources::FsRegistry;
use ccr::util::context::DEFAULT_REGISTRY_DIR;
use ccr::util::{Config, GlobalContext};

pub mod activate;
pub mod completions;
pub mod info;
pub mod list;
pub mod lock;
pub mod validate;

/// Open the registry named by `--registry`, the config, or the default
/// `registry/` directory, in that order.
pub fn open_registry(ctx: &GlobalContext, config: &Config, flag: Option<PathBuf>) -> FsRegistry {
    let root = flag
        .or_else(|| config.registry.path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REGISTRY_DIR));
    let root = ctx.resolve_path(&root);

    tracing::debug!("Using registry at {}", root.display());
    FsRegistry::new(root)
}
