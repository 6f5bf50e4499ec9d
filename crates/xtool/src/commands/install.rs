//! Package install command

use anyhow::{Context, Result};

use super::Workspace;
use crate::cli::PackageArgs;
use crate::output;

pub fn run(args: PackageArgs, workspace: &Workspace) -> Result<()> {
    let mut manager = workspace.open()?;

    manager
        .install_package(&args.name)
        .with_context(|| format!("Failed to install {}", args.name))?;

    let target = manager.layout().target_dir(&args.name);
    output::success(&format!("Installed {}", args.name));
    output::kv("location", &target.display().to_string());
    Ok(())
}
