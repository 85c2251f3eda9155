//! Configuration for the ccna launcher
//!
//! A single JSON record lives at `~/.claude-config/config.json`. It holds the
//! API endpoint, the bearer token and the model id picked for each role.

use anyhow::{anyhow, Context};
use std::fs::DirBuilder;
#[cfg(unix)]
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

mod fs;
mod record;
mod store;

pub use fs::*;
pub use record::*;
pub use store::*;

/// Directory under the user's home that holds the config file.
pub const CONFIG_DIR_NAME: &str = ".claude-config";

/// File name of the persisted record.
pub const CONFIG_FILE_NAME: &str = "config.json";

pub fn home_dir() -> anyhow::Result<PathBuf> {
    dirs_next::home_dir().ok_or_else(|| anyhow!("can't find HOME dir"))
}

/// Returns the path of the config file for the current user.
pub fn user_config_path() -> anyhow::Result<PathBuf> {
    let home = home_dir().context("resolve config path")?;
    Ok(config_path_from(&home))
}

fn config_path_from(home_dir: &Path) -> PathBuf {
    home_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

pub fn create_user_owned_dirs(p: &Path) -> anyhow::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        builder.mode(0o700);
    }

    builder
        .create(p)
        .with_context(|| format!("create directory {}", p.display()))?;
    Ok(())
}
