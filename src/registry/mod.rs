//! Installed mod registry
//!
//! The Mods folder is the only source of truth: every immediate
//! subdirectory is an installed mod. Nothing is cached between scans.

pub mod manifest;
pub mod remove;

pub use manifest::{Manifest, ManifestError};
pub use remove::{remove_mods, DeleteError, RemovalOutcome, RemovalReport};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// State of a mod folder's manifest
#[derive(Debug, Clone)]
pub enum ManifestStatus {
    /// No manifest.json in the folder
    Absent,
    /// Manifest parsed
    Parsed(Manifest),
    /// Manifest exists but could not be read or parsed
    Invalid(String),
}

/// One installed mod as seen on disk
#[derive(Debug, Clone)]
pub struct InstalledMod {
    /// Folder name inside the Mods folder
    pub folder_name: String,
    /// Full path to the mod folder
    pub path: PathBuf,
    /// Label for display
    pub label: String,
    pub manifest: ManifestStatus,
}

impl InstalledMod {
    /// Build an entry for a mod folder, reading its manifest if present
    pub fn from_dir(path: &Path) -> Self {
        let folder_name = crate::paths::display_name(path);

        let manifest = match manifest::find_manifest(path) {
            None => ManifestStatus::Absent,
            Some(manifest_path) => match manifest::read_manifest(&manifest_path) {
                Ok(parsed) => ManifestStatus::Parsed(parsed),
                Err(e) => {
                    warn!("Bad manifest in {}: {}", path.display(), e);
                    ManifestStatus::Invalid(e.to_string())
                }
            },
        };

        let label = match &manifest {
            ManifestStatus::Absent => folder_name.clone(),
            ManifestStatus::Parsed(parsed) => parsed.label(),
            ManifestStatus::Invalid(reason) => {
                format!("{folder_name} (manifest parse failed: {reason})")
            }
        };

        Self {
            folder_name,
            path: path.to_path_buf(),
            label,
            manifest,
        }
    }

    /// Parsed manifest, if any
    pub fn parsed_manifest(&self) -> Option<&Manifest> {
        match &self.manifest {
            ManifestStatus::Parsed(manifest) => Some(manifest),
            _ => None,
        }
    }

    /// Number of files under the mod folder
    pub fn file_count(&self) -> usize {
        walkdir::WalkDir::new(&self.path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .count()
    }
}

/// Scan errors (the folder as a whole, never a single mod)
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Mods folder is not set or does not exist: {}", .0.display())]
    FolderMissing(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// List installed mods, sorted by folder name
pub fn list_mods(target_folder: &Path) -> Result<Vec<InstalledMod>, ScanError> {
    if !target_folder.is_dir() {
        return Err(ScanError::FolderMissing(target_folder.to_path_buf()));
    }

    let read_err = |source| ScanError::Io {
        path: target_folder.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(target_folder).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }

    let mut mods: Vec<InstalledMod> = dirs.iter().map(|dir| InstalledMod::from_dir(dir)).collect();
    mods.sort_by(|a, b| a.folder_name.cmp(&b.folder_name));

    debug!("Scanned {}: {} mods", target_folder.display(), mods.len());
    Ok(mods)
}

/// Status line for a finished scan
pub fn loaded_message(count: usize) -> String {
    format!("{count} mods loaded")
}
