//! Package parse command

use anyhow::{Context, Result};

use super::Workspace;
use crate::cli::ParseArgs;
use crate::output;

pub fn run(args: ParseArgs, workspace: &Workspace) -> Result<()> {
    let mut manager = workspace.open()?;

    let entry = manager
        .parse_source(args.path.as_std_path())
        .with_context(|| format!("Failed to parse {}", args.path))?;

    output::success(&format!("{} is {}", entry.pkgname, entry.state()));
    output::kv("files", &entry.files_list.len().to_string());
    if let Some(shortcuts) = entry.config.get("shortcuts").and_then(|v| v.as_object()) {
        for (name, file) in shortcuts {
            output::kv(&format!("shortcut {}", name), file.as_str().unwrap_or("-"));
        }
    }
    Ok(())
}
