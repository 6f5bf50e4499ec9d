//! Lifecycle operations without a core implementation
//!
//! These surface the manager's `NotImplemented` error.

use anyhow::{Context, Result};

use super::Workspace;
use crate::cli::{PackageArgs, TransferArgs};

pub fn verify(args: PackageArgs, workspace: &Workspace) -> Result<()> {
    workspace
        .open()?
        .verify_package(&args.name)
        .with_context(|| format!("Failed to verify {}", args.name))
}

pub fn uninstall(args: PackageArgs, workspace: &Workspace) -> Result<()> {
    workspace
        .open()?
        .uninstall_package(&args.name)
        .with_context(|| format!("Failed to uninstall {}", args.name))
}

pub fn export(args: TransferArgs, workspace: &Workspace) -> Result<()> {
    workspace
        .open()?
        .export_package(&args.name, args.target.as_std_path())
        .with_context(|| format!("Failed to export {}", args.name))
}

pub fn backup(args: TransferArgs, workspace: &Workspace) -> Result<()> {
    workspace
        .open()?
        .backup_package_usr_data(&args.name, args.target.as_std_path())
        .with_context(|| format!("Failed to back up user data of {}", args.name))
}
