//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// xtool - portable package catalog and installer
#[derive(Parser, Debug)]
#[command(name = "xtool")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Deploy directory holding the catalog, the source and target roots
    #[arg(long, global = true, env = "XTOOL_DEPLOY", default_value = "./deploy")]
    pub deploy: Utf8PathBuf,

    /// Source root (defaults to <deploy>/source)
    #[arg(long, global = true, env = "XTOOL_SOURCE")]
    pub source: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List packages in the catalog
    List(ListArgs),

    /// Parse a package folder and make it available
    Parse(ParseArgs),

    /// Install an available package
    Install(PackageArgs),

    /// Remove every package from the catalog and the target root
    Purge(PurgeArgs),

    /// Verify an installed package
    Verify(PackageArgs),

    /// Uninstall a package
    Uninstall(PackageArgs),

    /// Export a package
    Export(TransferArgs),

    /// Back up a package's user data
    Backup(TransferArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Installed packages only
    #[arg(short, long)]
    pub installed: bool,

    /// Available packages only
    #[arg(short, long)]
    pub available: bool,

    /// Show config and file list of each package
    #[arg(short, long)]
    pub complete: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Package folder
    pub path: Utf8PathBuf,
}

#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Package name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct TransferArgs {
    /// Package name
    pub name: String,

    /// Destination path
    pub target: Utf8PathBuf,
}
