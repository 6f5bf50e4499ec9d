//! Deploy directory layout
//!
//! ```text
//! <deploy>/
//!   xtool.yaml      optional settings
//!   xtool.db        catalog store
//!   source/         canonical package sources (default location)
//!   target/         installed package copies
//! ```

use crate::config::Settings;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

const SOURCE_DIR_NAME: &str = "source";
const TARGET_DIR_NAME: &str = "target";

/// Resolved, absolute directories a package manager works in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployLayout {
    /// Working directory holding the store and the default roots
    pub deploy_root: PathBuf,

    /// Canonical location of normalized package sources
    pub source_root: PathBuf,

    /// Location of installed package copies
    pub target_root: PathBuf,

    /// Catalog store file
    pub store_path: PathBuf,
}

impl DeployLayout {
    /// Resolve the layout, creating the default source root and the target root
    ///
    /// The deploy directory must already exist. An explicit source root must
    /// exist as well; the default `<deploy>/source` is created on demand.
    pub fn prepare(deploy_dir: &Path, source_dir: Option<&Path>, settings: &Settings) -> Result<Self> {
        if !deploy_dir.is_dir() {
            return Err(Error::invalid_config(format!(
                "deploy path is not a directory: {}",
                deploy_dir.display()
            )));
        }
        let deploy_root = deploy_dir.canonicalize()?;

        let source_root = match source_dir {
            None => {
                let path = deploy_root.join(SOURCE_DIR_NAME);
                std::fs::create_dir_all(&path)?;
                path
            }
            Some(path) if path.exists() => path.canonicalize()?,
            Some(path) => {
                return Err(Error::invalid_config(format!(
                    "source folder does not exist: {}",
                    path.display()
                )))
            }
        };

        let target_root = deploy_root.join(TARGET_DIR_NAME);
        std::fs::create_dir_all(&target_root)?;

        let store_path = deploy_root.join(&settings.store_file);

        debug!(
            "Deploy layout: source={:?}, target={:?}, store={:?}",
            source_root, target_root, store_path
        );

        Ok(Self {
            deploy_root,
            source_root,
            target_root,
            store_path,
        })
    }

    /// Install target directory of one package
    pub fn target_dir(&self, pkgname: &str) -> PathBuf {
        self.target_root.join(pkgname)
    }

    /// Canonical source location of one package (folder or archive stem)
    pub fn source_location(&self, pkgname: &str) -> PathBuf {
        self.source_root.join(pkgname)
    }

    /// Whether `path` lies inside the canonical source root
    pub fn is_in_source_root(&self, path: &Path) -> bool {
        path.starts_with(&self.source_root)
    }
}
