//! Package file delivery media
//!
//! A medium is a uniform read/write view over a package's files, backed by
//! either an extracted folder or a gzip-compressed tar archive. Both variants
//! implement [`Medium`]; [`create_medium`] picks the right one for a path.
//!
//! Media are created per operation. The file list is computed on first use
//! and cached for the lifetime of the handle; writes made through the handle
//! do not refresh it.

pub mod archive;
pub mod error;
pub mod folder;
pub mod matcher;
pub mod resolve;

pub use archive::ArchiveMedium;
pub use error::{MediumError, Result};
pub use folder::FolderMedium;
pub use resolve::{create_medium, create_medium_with};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use xtool_core::MatchSettings;

/// File name suffix of package archives
pub const ARCHIVE_SUFFIX: &str = ".tar.gz";

/// Default metadata document read when a medium is opened
pub const DEFAULT_META_FILE: &str = "config.json";

/// Options applied when opening a medium
#[derive(Debug, Clone, PartialEq)]
pub struct MediumOptions {
    /// Metadata document read on open; missing or malformed gives `{}`
    pub meta_file: String,

    /// Fuzzy matching thresholds for [`Medium::has_file`]
    pub matching: MatchSettings,
}

impl Default for MediumOptions {
    fn default() -> Self {
        Self {
            meta_file: DEFAULT_META_FILE.to_string(),
            matching: MatchSettings::default(),
        }
    }
}

impl MediumOptions {
    pub fn from_settings(settings: &xtool_core::Settings) -> Self {
        Self {
            meta_file: settings.medium_meta_file.clone(),
            matching: settings.matching.clone(),
        }
    }
}

/// Physical representation of a medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediumKind {
    Folder,
    Archive,
}

impl fmt::Display for MediumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediumKind::Folder => write!(f, "folder"),
            MediumKind::Archive => write!(f, "archive"),
        }
    }
}

/// Owned, serializable copy of what a medium exposes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediumSnapshot {
    pub path: PathBuf,
    pub kind: MediumKind,
    pub package_name: String,
    pub files: Vec<String>,
    pub meta: Value,
}

/// Capability contract shared by folder and archive media
pub trait Medium {
    /// Absolute location of the medium
    fn path(&self) -> &Path;

    fn kind(&self) -> MediumKind;

    /// Names of the files in the medium, computed once
    fn all_files(&self) -> Result<&[String]>;

    /// Metadata document read on open
    fn meta(&self) -> &Value;

    /// Matching thresholds used by [`Medium::has_file`]
    fn matching(&self) -> &MatchSettings;

    /// Contents of one file
    fn read_file(&self, name: &str) -> Result<Vec<u8>>;

    /// Create or replace one file
    fn write_file(&self, name: &str, data: &[u8]) -> Result<()>;

    /// Copy one file to the exact path `dest`
    fn copy_file(&self, name: &str, dest: &Path) -> Result<()>;

    /// Copy the whole medium into the folder `dest`
    fn copy_to(&self, dest: &Path) -> Result<FolderMedium>;

    /// Produce an archive of the medium at `dest` (suffix added if missing)
    fn archive_to(&self, dest: &Path) -> Result<ArchiveMedium>;

    /// Package name derived from the medium path
    fn package_name(&self) -> String {
        package_name_of(self.path())
    }

    /// Exact membership test
    fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.all_files()?.iter().any(|file| file == name))
    }

    /// Look up a file, falling back to a fuzzy match on executable-like names
    ///
    /// Returns the matched file name.
    fn has_file(&self, name: &str, fuzzy: bool) -> Result<Option<String>> {
        let files = self.all_files()?;
        if files.iter().any(|file| file == name) {
            return Ok(Some(name.to_string()));
        }
        if !fuzzy {
            return Ok(None);
        }
        Ok(matcher::fuzzy_find(name, files, self.matching()))
    }

    fn read_json_document(&self, name: &str) -> Result<Value> {
        Ok(serde_json::from_slice(&self.read_file(name)?)?)
    }

    fn write_json_document(&self, name: &str, document: &Value) -> Result<()> {
        self.write_file(name, &serde_json::to_vec_pretty(document)?)
    }

    fn snapshot(&self) -> Result<MediumSnapshot> {
        Ok(MediumSnapshot {
            path: self.path().to_path_buf(),
            kind: self.kind(),
            package_name: self.package_name(),
            files: self.all_files()?.to_vec(),
            meta: self.meta().clone(),
        })
    }
}

/// A resolved medium of either kind
#[derive(Debug)]
pub enum PackageMedium {
    Folder(FolderMedium),
    Archive(ArchiveMedium),
}

impl PackageMedium {
    fn inner(&self) -> &dyn Medium {
        match self {
            PackageMedium::Folder(folder) => folder,
            PackageMedium::Archive(archive) => archive,
        }
    }
}

impl From<FolderMedium> for PackageMedium {
    fn from(folder: FolderMedium) -> Self {
        PackageMedium::Folder(folder)
    }
}

impl From<ArchiveMedium> for PackageMedium {
    fn from(archive: ArchiveMedium) -> Self {
        PackageMedium::Archive(archive)
    }
}

impl Medium for PackageMedium {
    fn path(&self) -> &Path {
        self.inner().path()
    }

    fn kind(&self) -> MediumKind {
        self.inner().kind()
    }

    fn all_files(&self) -> Result<&[String]> {
        self.inner().all_files()
    }

    fn meta(&self) -> &Value {
        self.inner().meta()
    }

    fn matching(&self) -> &MatchSettings {
        self.inner().matching()
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        self.inner().read_file(name)
    }

    fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
        self.inner().write_file(name, data)
    }

    fn copy_file(&self, name: &str, dest: &Path) -> Result<()> {
        self.inner().copy_file(name, dest)
    }

    fn copy_to(&self, dest: &Path) -> Result<FolderMedium> {
        self.inner().copy_to(dest)
    }

    fn archive_to(&self, dest: &Path) -> Result<ArchiveMedium> {
        self.inner().archive_to(dest)
    }
}

/// Package name of a medium path: the file name up to its first `.`
pub fn package_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

/// Whether `path` ends with [`ARCHIVE_SUFFIX`]
pub fn has_archive_suffix(path: &Path) -> bool {
    path.to_string_lossy().ends_with(ARCHIVE_SUFFIX)
}

/// `path` with [`ARCHIVE_SUFFIX`] appended unless already present
pub fn archive_path_for(path: &Path) -> PathBuf {
    if has_archive_suffix(path) {
        path.to_path_buf()
    } else {
        let mut raw = path.as_os_str().to_os_string();
        raw.push(ARCHIVE_SUFFIX);
        PathBuf::from(raw)
    }
}

/// Read the metadata document of a freshly opened medium
fn load_meta(medium: &dyn Medium, meta_file: &str) -> Value {
    medium
        .read_json_document(meta_file)
        .unwrap_or_else(|_| Value::Object(Map::new()))
}
