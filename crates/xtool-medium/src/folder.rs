//! Folder-backed medium

use crate::archive::{self, ArchiveMedium};
use crate::error::{MediumError, Result};
use crate::{archive_path_for, load_meta, Medium, MediumKind, MediumOptions};
use serde_json::Value;
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use xtool_core::MatchSettings;

/// An extracted package directory
#[derive(Debug)]
pub struct FolderMedium {
    path: PathBuf,
    options: MediumOptions,
    meta: Value,
    files: OnceCell<Vec<String>>,
}

impl FolderMedium {
    /// Open a folder medium; the directory must exist
    pub fn open(path: impl Into<PathBuf>, options: MediumOptions) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(MediumError::NotFound(path));
        }

        let mut medium = Self {
            path,
            options,
            meta: Value::Null,
            files: OnceCell::new(),
        };
        medium.meta = load_meta(&medium, &medium.options.meta_file);
        Ok(medium)
    }

    /// Build an archive of this folder at `target` (default: next to the folder)
    pub fn pack(&self, target: Option<&Path>) -> Result<ArchiveMedium> {
        let archive_path = archive_path_for(target.unwrap_or(&self.path));
        debug!("Packing {:?} into {:?}", self.path, archive_path);

        archive::build_archive(&self.path, &archive_path)?;
        ArchiveMedium::open(archive_path, self.options.clone())
    }

    fn member_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Medium for FolderMedium {
    fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> MediumKind {
        MediumKind::Folder
    }

    /// Direct entries of the folder, sorted; subdirectories are not walked
    fn all_files(&self) -> Result<&[String]> {
        if let Some(files) = self.files.get() {
            return Ok(files.as_slice());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            files.push(entry?.file_name().to_string_lossy().into_owned());
        }
        files.sort();

        Ok(self.files.get_or_init(|| files).as_slice())
    }

    fn meta(&self) -> &Value {
        &self.meta
    }

    fn matching(&self) -> &MatchSettings {
        &self.options.matching
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.member_path(name);
        if !path.is_file() {
            return Err(MediumError::file_not_found(name, &self.path));
        }
        Ok(fs::read(path)?)
    }

    fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
        let path = self.member_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }

    fn copy_file(&self, name: &str, dest: &Path) -> Result<()> {
        let source = self.member_path(name);
        if !source.is_file() {
            return Err(MediumError::file_not_found(name, &self.path));
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, dest)?;
        Ok(())
    }

    /// Copy the folder tree into `dest`, merging with anything already there
    fn copy_to(&self, dest: &Path) -> Result<FolderMedium> {
        debug!("Copying {:?} to {:?}", self.path, dest);
        fs::create_dir_all(dest)?;

        for entry in WalkDir::new(&self.path).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| MediumError::Io(e.into()))?;
            let relative = entry
                .path()
                .strip_prefix(&self.path)
                .map_err(|e| MediumError::archive(entry.path(), e))?;
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &target)?;
            }
        }

        FolderMedium::open(dest, self.options.clone())
    }

    fn archive_to(&self, dest: &Path) -> Result<ArchiveMedium> {
        self.pack(Some(dest))
    }
}
