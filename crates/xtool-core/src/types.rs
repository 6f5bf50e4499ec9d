//! Catalog entry and lifecycle event types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Persisted record describing one package in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Package name (primary key)
    pub pkgname: String,

    /// Per-package configuration document
    #[serde(default = "empty_config")]
    pub config: Value,

    /// Source is present in the canonical source root
    #[serde(default)]
    pub is_available: bool,

    /// Package has been copied into the install target root
    #[serde(default)]
    pub is_installed: bool,

    /// Files contained in the package medium
    #[serde(default)]
    pub files_list: Vec<String>,
}

fn empty_config() -> Value {
    Value::Object(Map::new())
}

impl CatalogEntry {
    /// Create an entry with default flags and an empty config
    pub fn new(pkgname: impl Into<String>) -> Self {
        Self {
            pkgname: pkgname.into(),
            config: empty_config(),
            is_available: false,
            is_installed: false,
            files_list: Vec::new(),
        }
    }

    /// Create an available, not yet installed entry
    pub fn available(pkgname: impl Into<String>, config: Value, files_list: Vec<String>) -> Self {
        Self {
            pkgname: pkgname.into(),
            config,
            is_available: true,
            is_installed: false,
            files_list,
        }
    }

    /// Lifecycle state derived from the entry flags
    pub fn state(&self) -> PackageState {
        if self.is_installed {
            PackageState::Installed
        } else if self.is_available {
            PackageState::Available
        } else {
            PackageState::Unknown
        }
    }

    /// Multi-line rendering with config and file list
    pub fn describe(&self) -> String {
        let config = serde_json::to_string_pretty(&self.config).unwrap_or_default();
        let files = serde_json::to_string_pretty(&self.files_list).unwrap_or_default();
        format!("{}\n{}\n{}", self.pkgname, config, files)
    }
}

impl fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pkgname)
    }
}

/// Package lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageState {
    /// Not in the catalog, or purged
    #[default]
    Unknown,
    /// Parsed into the source root
    Available,
    /// Copied into the install target root
    Installed,
}

impl fmt::Display for PackageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageState::Unknown => write!(f, "unknown"),
            PackageState::Available => write!(f, "available"),
            PackageState::Installed => write!(f, "installed"),
        }
    }
}

/// Filter for catalog listings; set flags must all match
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub installed: bool,
    pub available: bool,
}

impl CatalogFilter {
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        (!self.installed || entry.is_installed) && (!self.available || entry.is_available)
    }
}

/// Lifecycle events extensions can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    ParseSource,
    InstallPackage,
    PurgeAll,
    VerifyPackage,
    UninstallPackage,
    ExportPackage,
    BackupPackageUsrData,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::ParseSource,
        EventKind::InstallPackage,
        EventKind::PurgeAll,
        EventKind::VerifyPackage,
        EventKind::UninstallPackage,
        EventKind::ExportPackage,
        EventKind::BackupPackageUsrData,
    ];

    /// Event name as seen by extensions and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ParseSource => "parseSource",
            EventKind::InstallPackage => "installPackage",
            EventKind::PurgeAll => "purgeAll",
            EventKind::VerifyPackage => "verifyPackage",
            EventKind::UninstallPackage => "uninstallPackage",
            EventKind::ExportPackage => "exportPackage",
            EventKind::BackupPackageUsrData => "backupPackageUsrData",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_follows_flags() {
        let mut entry = CatalogEntry::new("trid");
        assert_eq!(entry.state(), PackageState::Unknown);

        entry.is_available = true;
        assert_eq!(entry.state(), PackageState::Available);

        entry.is_installed = true;
        assert_eq!(entry.state(), PackageState::Installed);
    }

    #[test]
    fn test_entry_deserializes_with_defaults() {
        let entry: CatalogEntry = serde_json::from_value(json!({ "pkgname": "trid" })).unwrap();
        assert_eq!(entry.config, json!({}));
        assert!(!entry.is_available);
        assert!(!entry.is_installed);
        assert!(entry.files_list.is_empty());
    }

    #[test]
    fn test_display_and_describe() {
        let entry = CatalogEntry::available(
            "trid",
            json!({ "shortcuts": { "trid": "trid.exe" } }),
            vec!["trid.exe".to_string()],
        );
        assert_eq!(entry.to_string(), "trid");

        let described = entry.describe();
        assert!(described.starts_with("trid\n"));
        assert!(described.contains("\"shortcuts\""));
        assert!(described.contains("\"trid.exe\""));
    }

    #[test]
    fn test_filter_requires_all_set_flags() {
        let mut entry = CatalogEntry::available("trid", json!({}), vec![]);
        let both = CatalogFilter {
            installed: true,
            available: true,
        };
        assert!(!both.matches(&entry));

        entry.is_installed = true;
        assert!(both.matches(&entry));
        assert!(CatalogFilter::default().matches(&CatalogEntry::new("x")));
    }

    #[test]
    fn test_event_names() {
        assert_eq!(EventKind::ParseSource.to_string(), "parseSource");
        assert_eq!(
            EventKind::BackupPackageUsrData.as_str(),
            "backupPackageUsrData"
        );
        assert_eq!(EventKind::ALL.len(), 7);
    }
}
