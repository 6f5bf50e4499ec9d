//! xtool.yaml settings
//!
//! Settings are optional: a deploy directory without `xtool.yaml` runs on
//! defaults. Every field may be omitted from the file.
//!
//! ```yaml
//! package_config_file: xtool.json
//! medium_meta_file: config.json
//! store_file: xtool.db
//! matching:
//!   accept_score: 80
//!   early_exit_score: 99
//!   executable_extensions: [".exe", ".py", ".bat", ".sh"]
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Settings file looked up in the deploy directory
pub const SETTINGS_FILE_NAME: &str = "xtool.yaml";

/// Default per-package configuration document name
const DEFAULT_PACKAGE_CONFIG_FILE: &str = "xtool.json";

/// Default medium metadata document name
const DEFAULT_MEDIUM_META_FILE: &str = "config.json";

/// Default catalog store file name
const DEFAULT_STORE_FILE: &str = "xtool.db";

/// Default minimum similarity for a fuzzy file match
pub const DEFAULT_ACCEPT_SCORE: u8 = 80;

/// Default similarity at which executable resolution stops searching
pub const DEFAULT_EARLY_EXIT_SCORE: u8 = 99;

/// Default suffixes of files that look executable
pub const DEFAULT_EXECUTABLE_EXTENSIONS: &[&str] = &[".exe", ".py", ".bat", ".sh"];

/// Top-level xtool settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Package configuration document read from each medium during parse
    pub package_config_file: String,

    /// Metadata document read when a medium is opened
    pub medium_meta_file: String,

    /// Catalog store file, relative to the deploy directory
    pub store_file: String,

    /// Fuzzy matching thresholds
    pub matching: MatchSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            package_config_file: DEFAULT_PACKAGE_CONFIG_FILE.to_string(),
            medium_meta_file: DEFAULT_MEDIUM_META_FILE.to_string(),
            store_file: DEFAULT_STORE_FILE.to_string(),
            matching: MatchSettings::default(),
        }
    }
}

/// Fuzzy file-name matching thresholds (scores are 0-100)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchSettings {
    /// A fuzzy match must score above this to be accepted
    pub accept_score: u8,

    /// Executable resolution stops once a candidate reaches this score
    pub early_exit_score: u8,

    /// Suffixes of files considered executable
    pub executable_extensions: Vec<String>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            accept_score: DEFAULT_ACCEPT_SCORE,
            early_exit_score: DEFAULT_EARLY_EXIT_SCORE,
            executable_extensions: DEFAULT_EXECUTABLE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl MatchSettings {
    /// Whether `name` ends with one of the executable suffixes
    pub fn is_executable_name(&self, name: &str) -> bool {
        self.executable_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
    }
}

impl Settings {
    /// Load settings from `<deploy_dir>/xtool.yaml`, falling back to defaults
    pub fn load(deploy_dir: &Path) -> Result<Self> {
        let path = deploy_dir.join(SETTINGS_FILE_NAME);
        if !path.is_file() {
            debug!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let settings = Self::from_yaml(&content)
            .map_err(|e| Error::invalid_config(format!("{}: {}", path.display(), e)))?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Parse and validate settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file deserializes to null rather than an empty mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml_ng::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        let matching = &self.matching;
        if matching.accept_score > 100 || matching.early_exit_score > 100 {
            return Err(Error::invalid_config("match scores must be within 0-100"));
        }
        if matching.early_exit_score < matching.accept_score {
            return Err(Error::invalid_config(
                "early_exit_score must not be lower than accept_score",
            ));
        }
        for (field, value) in [
            ("package_config_file", &self.package_config_file),
            ("medium_meta_file", &self.medium_meta_file),
            ("store_file", &self.store_file),
        ] {
            if value.trim().is_empty() {
                return Err(Error::invalid_config(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.package_config_file, "xtool.json");
        assert_eq!(settings.medium_meta_file, "config.json");
        assert_eq!(settings.store_file, "xtool.db");
        assert_eq!(settings.matching.accept_score, 80);
        assert_eq!(settings.matching.early_exit_score, 99);
        assert!(settings.matching.is_executable_name("run.sh"));
        assert!(!settings.matching.is_executable_name("readme.md"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let settings = Settings::from_yaml("matching:\n  accept_score: 70\n").unwrap();
        assert_eq!(settings.matching.accept_score, 70);
        assert_eq!(settings.matching.early_exit_score, 99);
        assert_eq!(settings.package_config_file, "xtool.json");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Settings::from_yaml("  \n").unwrap(), Settings::default());
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let result =
            Settings::from_yaml("matching:\n  accept_score: 90\n  early_exit_score: 50\n");
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        assert_eq!(Settings::load(temp.path()).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_malformed_file_is_invalid_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(SETTINGS_FILE_NAME), "matching: [1, 2").unwrap();
        let result = Settings::load(temp.path());
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }
}
