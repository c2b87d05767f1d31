//! ZIP listing and extraction.

use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use zip::result::ZipResult;
use zip::ZipArchive;

use crate::paths::to_linux_path;

use super::config::ExtractCause;

/// Extraction statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractStats {
    pub files: usize,
    pub dirs: usize,
    /// Entries skipped because their names would escape the destination
    pub skipped: usize,
}

/// List entry names in archive order, with backslashes normalized to `/`
pub fn list_entries<R: Read + Seek>(archive: &mut ZipArchive<R>) -> ZipResult<Vec<String>> {
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        names.push(to_linux_path(entry.name()));
    }
    Ok(names)
}

/// Relative output path for an entry name, or `None` if it is absolute or climbs out
pub fn safe_relative_path(name: &str) -> Option<PathBuf> {
    let normalized = to_linux_path(name);
    let mut out = PathBuf::new();
    for component in Path::new(&normalized).components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Extract every entry of `archive` under `output_dir`
pub fn extract_to_dir<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    output_dir: &Path,
) -> Result<ExtractStats, ExtractCause> {
    let mut stats = ExtractStats::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = to_linux_path(entry.name());

        let Some(rel_path) = safe_relative_path(&name) else {
            warn!("Skipping unsafe archive entry: {}", entry.name());
            stats.skipped += 1;
            continue;
        };
        let out_path = output_dir.join(rel_path);

        if name.ends_with('/') {
            fs::create_dir_all(&out_path)?;
            stats.dirs += 1;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut output = File::create(&out_path)?;
        io::copy(&mut entry, &mut output)?;
        debug!("Extracted {}", out_path.display());
        stats.files += 1;
    }

    Ok(stats)
}
