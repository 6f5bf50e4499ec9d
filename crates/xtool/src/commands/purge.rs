//! Catalog purge command

use anyhow::{Context, Result};
use dialoguer::Confirm;

use super::Workspace;
use crate::cli::PurgeArgs;
use crate::output;

pub fn run(args: PurgeArgs, workspace: &Workspace) -> Result<()> {
    if !args.yes {
        output::warning(&format!(
            "This will forget every package and delete the target root in {}",
            workspace.deploy()
        ));

        let confirmed = Confirm::new()
            .with_prompt("Continue with purge?")
            .default(false)
            .interact()?;

        if !confirmed {
            output::info("Purge cancelled");
            return Ok(());
        }
    }

    let mut manager = workspace.open()?;
    let removed = manager.purge_all().context("Failed to purge packages")?;

    output::success(&format!("Purged {} package(s)", removed));
    Ok(())
}
