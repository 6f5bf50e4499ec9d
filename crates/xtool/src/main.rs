//! xtool CLI - portable package catalog and installer
//!
//! This is the main entry point for the xtool command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let workspace = commands::Workspace::new(cli.deploy, cli.source);
    match cli.command {
        Commands::List(args) => commands::list::run(args, &workspace),
        Commands::Parse(args) => commands::parse::run(args, &workspace),
        Commands::Install(args) => commands::install::run(args, &workspace),
        Commands::Purge(args) => commands::purge::run(args, &workspace),
        Commands::Verify(args) => commands::pending::verify(args, &workspace),
        Commands::Uninstall(args) => commands::pending::uninstall(args, &workspace),
        Commands::Export(args) => commands::pending::export(args, &workspace),
        Commands::Backup(args) => commands::pending::backup(args, &workspace),
    }
}

/// Log level for the verbosity flags
fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        // Lifecycle milestones are logged at info
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::new(log_level(verbose, quiet)))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_follows_flags() {
        assert_eq!(log_level(0, false), "info");
        assert_eq!(log_level(1, false), "debug");
        assert_eq!(log_level(3, false), "trace");
        assert_eq!(log_level(2, true), "error");
    }
}
