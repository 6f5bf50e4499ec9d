//! Archive-backed medium (gzip-compressed tar)

use crate::error::{MediumError, Result};
use crate::folder::FolderMedium;
use crate::{archive_path_for, load_meta, Medium, MediumKind, MediumOptions};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use std::cell::OnceCell;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tar::{Archive, Builder, EntryType, Header};
use tracing::debug;
use walkdir::WalkDir;
use xtool_core::MatchSettings;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A package packed into a `.tar.gz` archive
#[derive(Debug)]
pub struct ArchiveMedium {
    path: PathBuf,
    options: MediumOptions,
    meta: Value,
    files: OnceCell<Vec<String>>,
}

impl ArchiveMedium {
    /// Open an archive medium; the file must exist
    pub fn open(path: impl Into<PathBuf>, options: MediumOptions) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
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

    /// Extract the whole archive into `dest`
    pub fn unpack(&self, dest: &Path) -> Result<()> {
        fs::create_dir_all(dest)?;
        let mut archive = self.reader()?;
        archive
            .unpack(dest)
            .map_err(|e| MediumError::archive(&self.path, e))?;
        Ok(())
    }

    fn reader(&self) -> Result<Archive<GzDecoder<File>>> {
        let file = File::open(&self.path)?;
        Ok(Archive::new(GzDecoder::new(file)))
    }

    /// Rewrite the archive with `name` set to `data`
    fn rewrite_with(&self, name: &str, data: &[u8]) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        let staged = tempfile::NamedTempFile::new_in(parent)?;

        {
            let encoder = GzEncoder::new(staged.as_file(), Compression::default());
            let mut builder = Builder::new(encoder);

            let mut archive = self.reader()?;
            let entries = archive
                .entries()
                .map_err(|e| MediumError::archive(&self.path, e))?;
            for entry in entries {
                let mut entry = entry.map_err(|e| MediumError::archive(&self.path, e))?;
                if member_name(&entry)? == name {
                    continue;
                }
                let member_path = entry.path()?.into_owned();
                let mut header = entry.header().clone();
                builder
                    .append_data(&mut header, &member_path, &mut entry)
                    .map_err(|e| MediumError::archive(&self.path, e))?;
            }

            let mut header = Header::new_gnu();
            header.set_entry_type(EntryType::Regular);
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder
                .append_data(&mut header, name, data)
                .map_err(|e| MediumError::archive(&self.path, e))?;

            let encoder = builder
                .into_inner()
                .map_err(|e| MediumError::archive(&self.path, e))?;
            encoder.finish()?.flush()?;
        }

        staged
            .persist(&self.path)
            .map_err(|e| MediumError::Io(e.error))?;
        Ok(())
    }
}

impl Medium for ArchiveMedium {
    fn path(&self) -> &Path {
        &self.path
    }

    fn kind(&self) -> MediumKind {
        MediumKind::Archive
    }

    /// Member names in archive order; directories end with `/`
    fn all_files(&self) -> Result<&[String]> {
        if let Some(files) = self.files.get() {
            return Ok(files.as_slice());
        }

        let mut files = Vec::new();
        let mut archive = self.reader()?;
        let entries = archive
            .entries()
            .map_err(|e| MediumError::archive(&self.path, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| MediumError::archive(&self.path, e))?;
            files.push(member_name(&entry)?);
        }

        Ok(self.files.get_or_init(|| files).as_slice())
    }

    fn meta(&self) -> &Value {
        &self.meta
    }

    fn matching(&self) -> &MatchSettings {
        &self.options.matching
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = self.reader()?;
        let entries = archive
            .entries()
            .map_err(|e| MediumError::archive(&self.path, e))?;
        for entry in entries {
            let mut entry = entry.map_err(|e| MediumError::archive(&self.path, e))?;
            if entry.header().entry_type().is_file() && member_name(&entry)? == name {
                let mut data = Vec::new();
                entry.read_to_end(&mut data)?;
                return Ok(data);
            }
        }
        Err(MediumError::file_not_found(name, &self.path))
    }

    fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
        debug!("Writing {} into archive {:?}", name, self.path);
        self.rewrite_with(name, data)
    }

    fn copy_file(&self, name: &str, dest: &Path) -> Result<()> {
        let data = self.read_file(name)?;
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(dest, data)?;
        Ok(())
    }

    /// Extract into `dest` and return the extracted folder
    fn copy_to(&self, dest: &Path) -> Result<FolderMedium> {
        debug!("Extracting {:?} to {:?}", self.path, dest);
        self.unpack(dest)?;
        FolderMedium::open(dest, self.options.clone())
    }

    /// Copy the archive file itself
    fn archive_to(&self, dest: &Path) -> Result<ArchiveMedium> {
        let dest = archive_path_for(dest);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&self.path, &dest)?;
        ArchiveMedium::open(dest, self.options.clone())
    }
}

/// Whether `path` is a readable gzip-compressed tar archive
pub fn is_archive(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut magic = [0u8; 2];
    if file.read_exact(&mut magic).is_err() || magic != GZIP_MAGIC {
        return false;
    }

    let Ok(file) = File::open(path) else {
        return false;
    };
    let mut archive = Archive::new(GzDecoder::new(file));
    match archive.entries() {
        Ok(entries) => entries.into_iter().all(|entry| entry.is_ok()),
        Err(_) => false,
    }
}

/// Build a `.tar.gz` at `archive_path` holding the contents of `source_dir`
///
/// Member names are relative to `source_dir`, in sorted walk order.
pub(crate) fn build_archive(source_dir: &Path, archive_path: &Path) -> Result<()> {
    if let Some(parent) = archive_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(archive_path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| MediumError::Io(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| MediumError::archive(archive_path, e))?;
        let name = relative.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            builder
                .append_dir(&name, entry.path())
                .map_err(|e| MediumError::archive(archive_path, e))?;
        } else {
            builder
                .append_path_with_name(entry.path(), &name)
                .map_err(|e| MediumError::archive(archive_path, e))?;
        }
    }

    let encoder = builder
        .into_inner()
        .map_err(|e| MediumError::archive(archive_path, e))?;
    encoder.finish()?.sync_all()?;
    Ok(())
}

/// Normalized member name: `/` separators, no leading `./`, directories end with `/`
fn member_name<R: Read>(entry: &tar::Entry<'_, R>) -> Result<String> {
    let path = entry.path()?;
    let mut name = path.to_string_lossy().replace('\\', "/");
    while let Some(stripped) = name.strip_prefix("./") {
        name = stripped.to_string();
    }
    if entry.header().entry_type().is_dir() && !name.ends_with('/') {
        name.push('/');
    }
    Ok(name)
}
