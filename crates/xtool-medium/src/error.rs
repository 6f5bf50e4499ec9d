//! Error types for package media

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, MediumError>;

#[derive(Error, Debug)]
pub enum MediumError {
    /// Medium path does not exist
    #[error("Medium path not found: {0}")]
    NotFound(PathBuf),

    /// Requested file is not part of the medium
    #[error("File {name} not found in {medium}")]
    FileNotFound { name: String, medium: PathBuf },

    /// Archive could not be read or written
    #[error("Archive error in {path}: {message}")]
    Archive { path: PathBuf, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediumError {
    pub fn file_not_found(name: impl Into<String>, medium: impl Into<PathBuf>) -> Self {
        Self::FileNotFound {
            name: name.into(),
            medium: medium.into(),
        }
    }

    pub fn archive(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<MediumError> for xtool_core::Error {
    fn from(err: MediumError) -> Self {
        xtool_core::Error::Medium(Box::new(err))
    }
}
