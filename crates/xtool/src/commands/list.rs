//! Package list command

use anyhow::{Context, Result};
use tabled::{settings::Style, Table, Tabled};
use xtool_core::{CatalogEntry, CatalogFilter};

use super::Workspace;
use crate::cli::ListArgs;
use crate::output;

/// Row for one catalog entry
#[derive(Tabled)]
struct PackageRow {
    name: String,
    state: String,
    files: usize,
    shortcuts: String,
}

impl From<&CatalogEntry> for PackageRow {
    fn from(entry: &CatalogEntry) -> Self {
        let shortcuts = entry
            .config
            .get("shortcuts")
            .and_then(|value| value.as_object())
            .map(|map| map.keys().cloned().collect::<Vec<_>>().join(", "))
            .filter(|joined| !joined.is_empty())
            .unwrap_or_else(|| "-".to_string());

        Self {
            name: entry.pkgname.clone(),
            state: entry.state().to_string(),
            files: entry.files_list.len(),
            shortcuts,
        }
    }
}

/// List catalog entries
///
/// - Everything: `xtool list`
/// - Installed only: `xtool list --installed`
/// - Config and file lists: `xtool list --complete`
/// - JSON output: `xtool list --json`
pub fn run(args: ListArgs, workspace: &Workspace) -> Result<()> {
    let manager = workspace.open()?;
    let filter = CatalogFilter {
        installed: args.installed,
        available: args.available,
    };
    let entries = manager
        .list_packages(filter)
        .context("Failed to read the package catalog")?;

    if args.json {
        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize packages to JSON")?;
        println!("{}", json);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("No packages found");
        return Ok(());
    }

    if args.complete {
        for entry in &entries {
            output::header(&entry.pkgname);
            output::kv("state", &entry.state().to_string());
            println!("{}", entry.describe());
        }
        return Ok(());
    }

    let rows: Vec<PackageRow> = entries.iter().map(PackageRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{}", table);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_lists_shortcut_names() {
        let entry = CatalogEntry::available(
            "trid",
            json!({ "shortcuts": { "trid": "trid.exe", "gui": "tridgui.exe" } }),
            vec!["trid.exe".to_string(), "tridgui.exe".to_string()],
        );
        let row = PackageRow::from(&entry);
        assert_eq!(row.name, "trid");
        assert_eq!(row.state, "available");
        assert_eq!(row.files, 2);
        assert_eq!(row.shortcuts, "gui, trid");
    }

    #[test]
    fn test_row_without_shortcuts() {
        let row = PackageRow::from(&CatalogEntry::new("bare"));
        assert_eq!(row.state, "unknown");
        assert_eq!(row.shortcuts, "-");
    }
}
