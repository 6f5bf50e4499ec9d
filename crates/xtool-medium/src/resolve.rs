//! Medium resolution from a filesystem path

use crate::archive::{is_archive, ArchiveMedium};
use crate::error::Result;
use crate::folder::FolderMedium;
use crate::{archive_path_for, has_archive_suffix, MediumOptions, PackageMedium, ARCHIVE_SUFFIX};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a medium for `path` with default options
pub fn create_medium(path: &Path) -> Result<Option<PackageMedium>> {
    create_medium_with(path, &MediumOptions::default())
}

/// Resolve a medium for `path`
///
/// Tried in order: an existing directory, a valid archive at `path`, the
/// archive `path.tar.gz` (only when `path` has no archive suffix), and the
/// directory obtained by stripping the archive suffix. `None` when nothing
/// matches.
pub fn create_medium_with(path: &Path, options: &MediumOptions) -> Result<Option<PackageMedium>> {
    if path.is_dir() {
        debug!("Resolved {:?} as folder medium", path);
        return Ok(Some(FolderMedium::open(path, options.clone())?.into()));
    }

    if path.is_file() && is_archive(path) {
        debug!("Resolved {:?} as archive medium", path);
        return Ok(Some(ArchiveMedium::open(path, options.clone())?.into()));
    }

    if !has_archive_suffix(path) {
        let candidate = archive_path_for(path);
        if candidate.is_file() && is_archive(&candidate) {
            debug!("Resolved {:?} as archive medium {:?}", path, candidate);
            return Ok(Some(ArchiveMedium::open(candidate, options.clone())?.into()));
        }
    } else if let Some(stripped) = strip_archive_suffix(path) {
        if stripped.is_dir() {
            debug!("Resolved {:?} as folder medium {:?}", path, stripped);
            return Ok(Some(FolderMedium::open(stripped, options.clone())?.into()));
        }
    }

    debug!("No medium found for {:?}", path);
    Ok(None)
}

fn strip_archive_suffix(path: &Path) -> Option<PathBuf> {
    let raw = path.to_str()?;
    raw.strip_suffix(ARCHIVE_SUFFIX).map(PathBuf::from)
}
