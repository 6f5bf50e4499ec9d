//! # xtool-core
//!
//! Core library for xtool providing:
//! - The error taxonomy shared by every xtool crate
//! - Context bags used as extension scratch state
//! - Package catalog entry types and the SQLite-backed catalog store
//! - Settings (xtool.yaml) and the deploy directory layout

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod types;

pub use catalog::{Catalog, CatalogRepo, SessionPolicy};
pub use config::{DeployLayout, MatchSettings, Settings};
pub use context::{Context, ContextFields};
pub use error::{Error, Result};
pub use types::{CatalogEntry, CatalogFilter, EventKind, PackageState};
