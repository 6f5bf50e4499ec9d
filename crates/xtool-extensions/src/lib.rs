//! # xtool-extensions
//!
//! Extension dispatch and package lifecycle management:
//! - [`Extension`]: the plugin contract, one hook per lifecycle event
//! - [`ExtensionHost`]: registration and event dispatch with per-extension contexts
//! - [`PackageManager`]: parse, install and purge packages, notifying extensions
//! - [`ShortcutsExtension`]: bundled extension recording and writing launcher shortcuts

pub mod args;
pub mod extension;
pub mod host;
pub mod lifecycle;
pub mod shortcuts;

pub use args::{DispatchArgs, Sharing};
pub use extension::{
    ContextSchema, Extension, FromLayout, HookCall, HookError, HookResult, HookScope,
};
pub use host::{ExtensionHandle, ExtensionHost};
pub use lifecycle::{PackageManager, ARG_CONFIG, ARG_ENTRY, ARG_MEDIUM};
pub use shortcuts::{read_shortcuts, ShortcutDescriptor, ShortcutsExtension};
