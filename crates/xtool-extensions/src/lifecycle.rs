//! Package lifecycle management
//!
//! Packages move from unknown to available (parsed into the source root) to
//! installed (copied into the target root). Every state change is offered to
//! the registered extensions before the catalog commit that records it.
//!
//! Catalog writes and filesystem changes are not atomic together: a crash
//! between the copy into the target root and the catalog commit leaves an
//! installed copy the catalog does not know about.

use crate::args::DispatchArgs;
use crate::extension::{Extension, FromLayout, HookCall};
use crate::host::{ExtensionHandle, ExtensionHost};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use xtool_core::{
    Catalog, CatalogEntry, CatalogFilter, CatalogRepo, Context, DeployLayout, Error, EventKind,
    Result, SessionPolicy, Settings,
};
use xtool_medium::{create_medium_with, Medium, MediumOptions, PackageMedium};

/// Argument carrying the package configuration; shared between extensions
pub const ARG_CONFIG: &str = "config";
/// Argument carrying a medium snapshot
pub const ARG_MEDIUM: &str = "medium";
/// Argument carrying a catalog entry snapshot
pub const ARG_ENTRY: &str = "entry";

/// Owns the catalog, the deploy layout and the registered extensions
#[derive(Debug)]
pub struct PackageManager {
    layout: DeployLayout,
    settings: Settings,
    catalog: Catalog,
    extensions: ExtensionHost,
    global: Context,
}

impl PackageManager {
    /// Open a manager over `deploy_dir`, reading `xtool.yaml` when present
    pub fn open(deploy_dir: &Path, source_dir: Option<&Path>) -> Result<Self> {
        let settings = Settings::load(deploy_dir)?;
        Self::with_settings(deploy_dir, source_dir, settings)
    }

    /// Open a manager with explicit settings
    pub fn with_settings(
        deploy_dir: &Path,
        source_dir: Option<&Path>,
        settings: Settings,
    ) -> Result<Self> {
        let layout = DeployLayout::prepare(deploy_dir, source_dir, &settings)?;
        let catalog = Catalog::open(&layout.store_path)?;

        Ok(Self {
            layout,
            settings,
            catalog,
            extensions: ExtensionHost::new(),
            global: Context::new(),
        })
    }

    pub fn layout(&self) -> &DeployLayout {
        &self.layout
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Process-wide context visible to every extension
    pub fn global_context(&self) -> &Context {
        &self.global
    }

    pub fn global_context_mut(&mut self) -> &mut Context {
        &mut self.global
    }

    pub fn extensions(&self) -> &ExtensionHost {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionHost {
        &mut self.extensions
    }

    /// Register an extension type bound to this manager
    pub fn register_extension<E>(&mut self) -> Result<ExtensionHandle>
    where
        E: Extension + FromLayout + 'static,
    {
        self.extensions.register::<E>(&self.layout, &self.settings)
    }

    /// Offer an event to the registered extensions
    ///
    /// Returns the arguments as left by the extensions.
    pub fn dispatch(&mut self, call: HookCall<'_>, mut args: DispatchArgs) -> Result<DispatchArgs> {
        self.extensions
            .dispatch(call, &mut args, &mut self.global, &self.layout)?;
        Ok(args)
    }

    /// Make a package source available
    ///
    /// The source must be an existing directory. Sources outside the source
    /// root are archived into it. Re-parsing a package that is available and
    /// present in the target root changes nothing.
    pub fn parse_source(&mut self, source: &Path) -> Result<CatalogEntry> {
        if !source.exists() {
            return Err(Error::invalid_source(
                source.display().to_string(),
                "path does not exist",
            ));
        }
        if !source.is_dir() {
            return Err(Error::invalid_source(
                source.display().to_string(),
                "path is not a directory",
            ));
        }
        let source = source.canonicalize()?;

        let medium = self.resolve_medium(&source)?;
        let pkgname = medium.package_name();
        if pkgname.is_empty() {
            return Err(Error::invalid_source(
                source.display().to_string(),
                "cannot derive a package name",
            ));
        }
        debug!("Parsing {} from {:?}", pkgname, source);

        let existing = self
            .catalog
            .session(SessionPolicy::READ, |conn| CatalogRepo::get(conn, &pkgname))?;
        if let Some(entry) = existing {
            if entry.is_available && self.layout.target_dir(&pkgname).exists() {
                info!("Package {} is already available, skipping parse", pkgname);
                return Ok(entry);
            }
        }

        let medium = if self.layout.is_in_source_root(medium.path()) {
            medium
        } else {
            self.normalize_into_source_root(medium, &pkgname)?
        };

        let config = self.read_package_config(&medium);
        let args = DispatchArgs::new()
            .shared(ARG_CONFIG, &config)?
            .snapshot(ARG_MEDIUM, medium.snapshot()?)?;
        let mut args = self.dispatch(HookCall::ParseSource { source: &source }, args)?;

        let config = match args.take(ARG_CONFIG) {
            Some(value @ Value::Object(_)) => value,
            Some(other) => {
                warn!(
                    "Extensions left a non-mapping config for {} ({}), using an empty one",
                    pkgname, other
                );
                Value::Object(Map::new())
            }
            None => config,
        };

        let entry = CatalogEntry::available(&pkgname, config, medium.all_files()?.to_vec());
        self.catalog
            .session(SessionPolicy::WRITE, |conn| CatalogRepo::upsert(conn, &entry))?;

        info!("Package {} is available", pkgname);
        Ok(entry)
    }

    /// Copy an available package into the target root
    pub fn install_package(&mut self, pkgname: &str) -> Result<CatalogEntry> {
        // An empty name would resolve to the source and target roots themselves
        if pkgname.is_empty() {
            return Err(Error::package_not_found(pkgname));
        }
        let mut entry = self
            .catalog
            .session(SessionPolicy::READ, |conn| CatalogRepo::get(conn, pkgname))?
            .ok_or_else(|| Error::package_not_found(pkgname))?;
        if entry.is_installed {
            return Err(Error::already_installed(pkgname));
        }
        if !entry.is_available {
            return Err(Error::package_unavailable(pkgname));
        }

        let medium = self.resolve_medium(&self.layout.source_location(pkgname))?;
        let target = self.layout.target_dir(pkgname);
        debug!("Installing {} from {:?} into {:?}", pkgname, medium.path(), target);
        medium.copy_to(&target)?;

        let args = DispatchArgs::new()
            .snapshot(ARG_ENTRY, &entry)?
            .snapshot(ARG_MEDIUM, medium.snapshot()?)?;
        self.dispatch(HookCall::InstallPackage { package: pkgname }, args)?;

        self.catalog.session(SessionPolicy::WRITE, |conn| {
            CatalogRepo::set_installed(conn, pkgname, true)
        })?;

        entry.is_installed = true;
        info!("Package {} installed", pkgname);
        Ok(entry)
    }

    /// Forget every package and remove the target root
    ///
    /// Returns the number of catalog entries removed.
    pub fn purge_all(&mut self) -> Result<usize> {
        let removed = self
            .catalog
            .session(SessionPolicy::WRITE, CatalogRepo::delete_all)?;

        match fs::remove_dir_all(&self.layout.target_root) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Target root {:?} already absent", self.layout.target_root);
            }
            Err(e) => return Err(e.into()),
        }

        self.dispatch(HookCall::PurgeAll, DispatchArgs::new())?;

        info!("Purged {} package(s)", removed);
        Ok(removed)
    }

    pub fn verify_package(&mut self, _pkgname: &str) -> Result<()> {
        Err(Error::not_implemented(EventKind::VerifyPackage.as_str()))
    }

    pub fn uninstall_package(&mut self, _pkgname: &str) -> Result<()> {
        Err(Error::not_implemented(EventKind::UninstallPackage.as_str()))
    }

    pub fn export_package(&mut self, _pkgname: &str, _target: &Path) -> Result<()> {
        Err(Error::not_implemented(EventKind::ExportPackage.as_str()))
    }

    pub fn backup_package_usr_data(&mut self, _pkgname: &str, _target: &Path) -> Result<()> {
        Err(Error::not_implemented(
            EventKind::BackupPackageUsrData.as_str(),
        ))
    }

    /// Look up one package
    pub fn get_package(&self, pkgname: &str) -> Result<Option<CatalogEntry>> {
        self.catalog
            .session(SessionPolicy::READ, |conn| CatalogRepo::get(conn, pkgname))
    }

    /// List packages matching every flag set in `filter`
    pub fn list_packages(&self, filter: CatalogFilter) -> Result<Vec<CatalogEntry>> {
        self.catalog
            .session(SessionPolicy::READ, |conn| CatalogRepo::list(conn, filter))
    }

    fn medium_options(&self) -> MediumOptions {
        MediumOptions::from_settings(&self.settings)
    }

    fn resolve_medium(&self, path: &Path) -> Result<PackageMedium> {
        create_medium_with(path, &self.medium_options())?
            .ok_or_else(|| Error::medium_resolution(path.display().to_string()))
    }

    /// Put a source into the source root: folders are archived, archives copied
    fn normalize_into_source_root(
        &self,
        medium: PackageMedium,
        pkgname: &str,
    ) -> Result<PackageMedium> {
        let location = self.layout.source_location(pkgname);
        debug!("Normalizing {:?} into {:?}", medium.path(), location);

        let normalized: PackageMedium = match medium {
            PackageMedium::Folder(folder) => folder.pack(Some(&location))?.into(),
            PackageMedium::Archive(archive) => archive.archive_to(&location)?.into(),
        };
        Ok(normalized)
    }

    /// Package configuration document; missing or unreadable gives `{}`
    fn read_package_config(&self, medium: &PackageMedium) -> Value {
        let name = &self.settings.package_config_file;
        match medium.read_json_document(name) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                warn!("{} in {} is not a mapping, ignoring it", name, medium.package_name());
                Value::Object(Map::new())
            }
            Err(e) => {
                warn!("No usable {} in {}: {}", name, medium.package_name(), e);
                Value::Object(Map::new())
            }
        }
    }
}
