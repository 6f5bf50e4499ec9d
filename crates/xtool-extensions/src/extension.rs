//! Extension contract
//!
//! An extension is a plugin that observes package lifecycle events. Every
//! event has a hook method whose default body replies
//! [`HookError::NotImplemented`]; extensions override only the hooks they
//! care about. The dispatch engine remembers which hooks an extension does
//! not implement and skips them on later dispatches.
//!
//! Hooks receive their positional arguments directly and everything else
//! through the extension context exposed by [`HookScope`].

use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;
use xtool_core::{Context, ContextFields, DeployLayout, EventKind, Settings};

/// Outcome of one hook invocation
pub type HookResult = std::result::Result<(), HookError>;

/// Hook failure
#[derive(Debug, Error)]
pub enum HookError {
    /// The extension has no handler for the event
    #[error("hook not implemented")]
    NotImplemented,

    /// The handler ran and failed; aborts the dispatch
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl From<xtool_core::Error> for HookError {
    fn from(err: xtool_core::Error) -> Self {
        HookError::Failed(err.into())
    }
}

impl From<xtool_medium::MediumError> for HookError {
    fn from(err: xtool_medium::MediumError) -> Self {
        HookError::Failed(err.into())
    }
}

impl From<std::io::Error> for HookError {
    fn from(err: std::io::Error) -> Self {
        HookError::Failed(err.into())
    }
}

impl From<serde_json::Error> for HookError {
    fn from(err: serde_json::Error) -> Self {
        HookError::Failed(err.into())
    }
}

/// Event-specific context shape an extension can declare
#[derive(Clone, Copy)]
pub struct ContextSchema {
    type_name: &'static str,
    build: fn(Map<String, Value>) -> xtool_core::Result<Context>,
}

impl ContextSchema {
    /// Shape the context after `T`: undeclared arguments become extras and
    /// missing fields take their defaults
    pub fn of<T: ContextFields>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            build: Context::with_fields::<T>,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Seed a fresh context from dispatch arguments
    pub fn build(&self, seed: Map<String, Value>) -> xtool_core::Result<Context> {
        (self.build)(seed)
    }
}

impl std::fmt::Debug for ContextSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextSchema")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// State a hook can reach while it runs
pub struct HookScope<'a> {
    event: EventKind,
    context: &'a mut Context,
    global: &'a mut Context,
    layout: &'a DeployLayout,
}

impl<'a> HookScope<'a> {
    pub(crate) fn new(
        event: EventKind,
        context: &'a mut Context,
        global: &'a mut Context,
        layout: &'a DeployLayout,
    ) -> Self {
        Self {
            event,
            context,
            global,
            layout,
        }
    }

    /// Event being dispatched
    pub fn event(&self) -> EventKind {
        self.event
    }

    /// This extension's context, freshly seeded for the current dispatch
    pub fn context(&self) -> &Context {
        &*self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut *self.context
    }

    /// Process-wide context shared by the manager and every extension
    pub fn global(&self) -> &Context {
        &*self.global
    }

    pub fn global_mut(&mut self) -> &mut Context {
        &mut *self.global
    }

    pub fn layout(&self) -> &DeployLayout {
        self.layout
    }
}

/// A lifecycle plugin
pub trait Extension {
    /// Display name; must not be empty
    fn name(&self) -> &str;

    /// Context shape for `event`; `None` keeps the plain attribute bag
    fn context_schema(&self, _event: EventKind) -> Option<ContextSchema> {
        None
    }

    /// A package source was parsed and is about to be recorded as available
    fn parse_source(&mut self, _scope: &mut HookScope<'_>, _source: &Path) -> HookResult {
        Err(HookError::NotImplemented)
    }

    /// A package was copied into its install target
    fn install_package(&mut self, _scope: &mut HookScope<'_>, _package: &str) -> HookResult {
        Err(HookError::NotImplemented)
    }

    /// The catalog and the target root were wiped
    fn purge_all(&mut self, _scope: &mut HookScope<'_>) -> HookResult {
        Err(HookError::NotImplemented)
    }

    fn verify_package(&mut self, _scope: &mut HookScope<'_>, _package: &str) -> HookResult {
        Err(HookError::NotImplemented)
    }

    fn uninstall_package(&mut self, _scope: &mut HookScope<'_>, _package: &str) -> HookResult {
        Err(HookError::NotImplemented)
    }

    fn export_package(
        &mut self,
        _scope: &mut HookScope<'_>,
        _package: &str,
        _target: &Path,
    ) -> HookResult {
        Err(HookError::NotImplemented)
    }

    fn backup_package_usr_data(
        &mut self,
        _scope: &mut HookScope<'_>,
        _package: &str,
        _target: &Path,
    ) -> HookResult {
        Err(HookError::NotImplemented)
    }
}

/// Construction of an extension bound to its owning manager
///
/// Extensions receive the manager's layout and the settings it was opened
/// with.
pub trait FromLayout: Sized {
    fn from_layout(layout: &DeployLayout, settings: &Settings) -> anyhow::Result<Self>;
}

/// Positional arguments of one lifecycle event
#[derive(Debug, Clone, Copy)]
pub enum HookCall<'a> {
    ParseSource { source: &'a Path },
    InstallPackage { package: &'a str },
    PurgeAll,
    VerifyPackage { package: &'a str },
    UninstallPackage { package: &'a str },
    ExportPackage { package: &'a str, target: &'a Path },
    BackupPackageUsrData { package: &'a str, target: &'a Path },
}

impl HookCall<'_> {
    pub fn event(&self) -> EventKind {
        match self {
            HookCall::ParseSource { .. } => EventKind::ParseSource,
            HookCall::InstallPackage { .. } => EventKind::InstallPackage,
            HookCall::PurgeAll => EventKind::PurgeAll,
            HookCall::VerifyPackage { .. } => EventKind::VerifyPackage,
            HookCall::UninstallPackage { .. } => EventKind::UninstallPackage,
            HookCall::ExportPackage { .. } => EventKind::ExportPackage,
            HookCall::BackupPackageUsrData { .. } => EventKind::BackupPackageUsrData,
        }
    }

    /// Route the call to the matching hook of `extension`
    pub(crate) fn invoke(
        &self,
        extension: &mut dyn Extension,
        scope: &mut HookScope<'_>,
    ) -> HookResult {
        match *self {
            HookCall::ParseSource { source } => extension.parse_source(scope, source),
            HookCall::InstallPackage { package } => extension.install_package(scope, package),
            HookCall::PurgeAll => extension.purge_all(scope),
            HookCall::VerifyPackage { package } => extension.verify_package(scope, package),
            HookCall::UninstallPackage { package } => extension.uninstall_package(scope, package),
            HookCall::ExportPackage { package, target } => {
                extension.export_package(scope, package, target)
            }
            HookCall::BackupPackageUsrData { package, target } => {
                extension.backup_package_usr_data(scope, package, target)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Counter {
        #[serde(default)]
        count: u32,
    }

    #[test]
    fn test_call_event_names() {
        let call = HookCall::ExportPackage {
            package: "trid",
            target: Path::new("/tmp/out"),
        };
        assert_eq!(call.event(), EventKind::ExportPackage);
        assert_eq!(HookCall::PurgeAll.event().as_str(), "purgeAll");
    }

    #[test]
    fn test_schema_seeds_defaults_and_rejects_bad_types() {
        let schema = ContextSchema::of::<Counter>();
        assert!(schema.type_name().ends_with("Counter"));

        let mut seed = Map::new();
        seed.insert("extra".to_string(), json!(true));
        let ctx = schema.build(seed).unwrap();
        assert_eq!(ctx.get("count"), Some(&json!(0)));
        assert_eq!(ctx.get("extra"), Some(&json!(true)));

        let mut seed = Map::new();
        seed.insert("count".to_string(), json!("many"));
        assert!(schema.build(seed).is_err());
    }

    #[test]
    fn test_hook_error_conversions() {
        let err: HookError = xtool_core::Error::package_not_found("trid").into();
        assert!(matches!(err, HookError::Failed(_)));
        assert!(err.to_string().contains("trid"));
    }
}
