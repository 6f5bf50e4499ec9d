//! Error types for xtool-core

use thiserror::Error;

/// Result type alias using xtool-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for xtool
#[derive(Error, Debug)]
pub enum Error {
    /// Source path is missing or is not a directory
    #[error("Invalid source {path}: {reason}")]
    InvalidSource { path: String, reason: String },

    /// No folder or archive medium could be resolved for a path
    #[error("Could not resolve a package medium at {path}")]
    MediumResolution { path: String },

    /// Package is not in the catalog
    #[error("Package not found: {name}")]
    PackageNotFound { name: String },

    /// Package exists in the catalog but is not available
    #[error("Package is not available: {name}")]
    PackageUnavailable { name: String },

    /// Package is already installed
    #[error("Package is already installed: {name}")]
    AlreadyInstalled { name: String },

    /// Extension could not be registered
    #[error("Invalid extension {name}: {reason}")]
    InvalidExtension { name: String, reason: String },

    /// Extension context override rejected the dispatch arguments
    #[error("Invalid context type for {extension} on {event}: {reason}")]
    InvalidContextType {
        extension: String,
        event: String,
        reason: String,
    },

    /// Operation is part of the manager contract but has no core implementation
    #[error("Operation not implemented: {operation}")]
    NotImplemented { operation: String },

    /// An extension hook failed; dispatch was aborted
    #[error("Extension {extension} failed while handling {event}: {source}")]
    HookFailed {
        extension: String,
        event: String,
        #[source]
        source: anyhow::Error,
    },

    /// Invalid settings
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Catalog store error
    #[error("Catalog error: {0}")]
    Catalog(#[from] rusqlite::Error),

    /// Package medium error
    #[error("Medium error: {0}")]
    Medium(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid source error
    pub fn invalid_source(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSource {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a medium resolution error
    pub fn medium_resolution(path: impl Into<String>) -> Self {
        Self::MediumResolution { path: path.into() }
    }

    /// Create a package not found error
    pub fn package_not_found(name: impl Into<String>) -> Self {
        Self::PackageNotFound { name: name.into() }
    }

    /// Create a package unavailable error
    pub fn package_unavailable(name: impl Into<String>) -> Self {
        Self::PackageUnavailable { name: name.into() }
    }

    /// Create an already installed error
    pub fn already_installed(name: impl Into<String>) -> Self {
        Self::AlreadyInstalled { name: name.into() }
    }

    /// Create an invalid extension error
    pub fn invalid_extension(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExtension {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid context type error
    pub fn invalid_context_type(
        extension: impl Into<String>,
        event: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidContextType {
            extension: extension.into(),
            event: event.into(),
            reason: reason.into(),
        }
    }

    /// Create a not implemented error
    pub fn not_implemented(operation: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
        }
    }

    /// Create a hook failure error
    pub fn hook_failed(
        extension: impl Into<String>,
        event: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self::HookFailed {
            extension: extension.into(),
            event: event.into(),
            source,
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
