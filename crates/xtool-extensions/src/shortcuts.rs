//! Launcher shortcuts for installed packages
//!
//! While a source is parsed, the extension records the most likely
//! executable of the package under `config.shortcuts.<package>`. When the
//! package is installed, every configured shortcut is written as a JSON
//! descriptor into `<deploy>/shortcuts/`.

use crate::extension::{ContextSchema, Extension, FromLayout, HookResult, HookScope};
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use xtool_core::{CatalogEntry, DeployLayout, EventKind, MatchSettings, Settings};
use xtool_medium::matcher::resolve_executable;
use xtool_medium::MediumSnapshot;

/// Directory under the deploy root holding shortcut descriptors
pub const SHORTCUTS_DIR_NAME: &str = "shortcuts";

/// Config key holding the `name -> file` shortcut mapping
pub const SHORTCUTS_KEY: &str = "shortcuts";

const DESCRIPTOR_SUFFIX: &str = ".json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct ParseFields {
    #[serde(default)]
    config: Map<String, Value>,
    #[serde(default)]
    medium: Option<MediumSnapshot>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct InstallFields {
    #[serde(default)]
    entry: Option<CatalogEntry>,
}

/// A shortcut written on install
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutDescriptor {
    pub name: String,
    pub package: String,
    pub target: PathBuf,
}

/// Records and materializes package launcher shortcuts
#[derive(Debug)]
pub struct ShortcutsExtension {
    shortcuts_dir: PathBuf,
    target_root: PathBuf,
    matching: MatchSettings,
}

impl ShortcutsExtension {
    pub fn shortcuts_dir(&self) -> &Path {
        &self.shortcuts_dir
    }

    fn descriptor_path(&self, name: &str) -> PathBuf {
        self.shortcuts_dir.join(format!("{name}{DESCRIPTOR_SUFFIX}"))
    }
}

impl FromLayout for ShortcutsExtension {
    fn from_layout(layout: &DeployLayout, settings: &Settings) -> anyhow::Result<Self> {
        let shortcuts_dir = layout.deploy_root.join(SHORTCUTS_DIR_NAME);
        fs::create_dir_all(&shortcuts_dir).with_context(|| {
            format!("Failed to create shortcuts directory {:?}", shortcuts_dir)
        })?;

        Ok(Self {
            shortcuts_dir,
            target_root: layout.target_root.clone(),
            matching: settings.matching.clone(),
        })
    }
}

impl Extension for ShortcutsExtension {
    fn name(&self) -> &str {
        "shortcuts"
    }

    fn context_schema(&self, event: EventKind) -> Option<ContextSchema> {
        match event {
            EventKind::ParseSource => Some(ContextSchema::of::<ParseFields>()),
            EventKind::InstallPackage => Some(ContextSchema::of::<InstallFields>()),
            _ => None,
        }
    }

    fn parse_source(&mut self, scope: &mut HookScope<'_>, _source: &Path) -> HookResult {
        let mut fields: ParseFields = scope.context().fields()?;
        let Some(medium) = fields.medium.as_ref() else {
            debug!("No medium supplied, nothing to resolve");
            return Ok(());
        };
        let package = medium.package_name.clone();

        let shortcuts = fields
            .config
            .entry(SHORTCUTS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !shortcuts.is_object() {
            *shortcuts = Value::Object(Map::new());
        }

        if let Value::Object(map) = shortcuts {
            if map.is_empty() || !map.contains_key(&package) {
                match resolve_executable(&package, &medium.files, &self.matching) {
                    Some(file) => {
                        debug!("Resolved executable {} for {}", file, package);
                        map.insert(package.clone(), Value::String(file));
                    }
                    None => debug!("No executable found for {}", package),
                }
            }
        }

        scope.context_mut().set_fields(&fields)?;
        Ok(())
    }

    fn install_package(&mut self, scope: &mut HookScope<'_>, package: &str) -> HookResult {
        let fields: InstallFields = scope.context().fields()?;
        let shortcuts = fields
            .entry
            .as_ref()
            .and_then(|entry| entry.config.get(SHORTCUTS_KEY))
            .and_then(Value::as_object);

        let Some(shortcuts) = shortcuts else {
            error!("{} has no shortcuts", package);
            return Ok(());
        };

        fs::create_dir_all(&self.shortcuts_dir)?;
        let mut written = Vec::new();
        for (name, file) in shortcuts {
            let Some(file) = file.as_str() else {
                error!("Shortcut {} of {} does not name a file", name, package);
                continue;
            };
            let descriptor = ShortcutDescriptor {
                name: name.clone(),
                package: package.to_string(),
                target: self.target_root.join(package).join(file),
            };
            let path = self.descriptor_path(name);
            fs::write(&path, serde_json::to_vec_pretty(&descriptor)?)
                .with_context(|| format!("Failed to write shortcut {:?}", path))?;
            written.push(name.clone());
        }

        info!("Created {} shortcut(s) for {}", written.len(), package);
        scope.context_mut().set("created", &written)?;
        Ok(())
    }

    fn purge_all(&mut self, _scope: &mut HookScope<'_>) -> HookResult {
        match fs::remove_dir_all(&self.shortcuts_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(&self.shortcuts_dir)?;
        debug!("Cleared shortcuts in {:?}", self.shortcuts_dir);
        Ok(())
    }
}

/// Read every shortcut descriptor in `dir`, sorted by name
pub fn read_shortcuts(dir: &Path) -> anyhow::Result<Vec<ShortcutDescriptor>> {
    let mut shortcuts = Vec::new();
    if !dir.is_dir() {
        return Ok(shortcuts);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.to_string_lossy().ends_with(DESCRIPTOR_SUFFIX) {
            continue;
        }
        let content = fs::read(&path)?;
        let descriptor: ShortcutDescriptor = serde_json::from_slice(&content)
            .with_context(|| format!("Invalid shortcut descriptor {:?}", path))?;
        shortcuts.push(descriptor);
    }
    shortcuts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(shortcuts)
}
