//! Command implementations
//!
//! - list: show catalog entries
//! - parse: make a package folder available
//! - install: copy an available package into the target root
//! - purge: clear the catalog and the target root
//! - verify / uninstall / export / backup: reserved lifecycle operations

pub mod install;
pub mod list;
pub mod parse;
pub mod pending;
pub mod purge;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;
use xtool_extensions::{PackageManager, ShortcutsExtension};

/// Deploy and source locations selected on the command line
#[derive(Debug, Clone)]
pub struct Workspace {
    deploy: Utf8PathBuf,
    source: Option<Utf8PathBuf>,
}

impl Workspace {
    pub fn new(deploy: Utf8PathBuf, source: Option<Utf8PathBuf>) -> Self {
        Self { deploy, source }
    }

    pub fn deploy(&self) -> &Utf8Path {
        &self.deploy
    }

    /// Open the package manager with the bundled extensions registered
    pub fn open(&self) -> Result<PackageManager> {
        debug!("Opening deploy directory {}", self.deploy);
        let mut manager = PackageManager::open(
            self.deploy.as_std_path(),
            self.source.as_deref().map(Utf8Path::as_std_path),
        )
        .with_context(|| format!("Failed to open deploy directory {}", self.deploy))?;

        manager
            .register_extension::<ShortcutsExtension>()
            .context("Failed to register the shortcuts extension")?;

        Ok(manager)
    }
}
