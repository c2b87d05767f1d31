//! Target (Mods) folder resolution
//!
//! Order: explicit override, saved setting, auto-discovery.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::settings::Settings;

/// Where the Mods folder came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderSource {
    /// `--mods-dir` or `SDVMOD_MODS_DIR`
    Override,
    /// settings.json
    Saved,
    /// Found by probing install locations
    Detected,
}

impl fmt::Display for FolderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FolderSource::Override => "override",
            FolderSource::Saved => "saved",
            FolderSource::Detected => "auto-detected",
        };
        write!(f, "{label}")
    }
}

/// The resolved Mods folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFolder {
    pub path: PathBuf,
    pub source: FolderSource,
}

impl TargetFolder {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record this folder in `settings` unless it is a one-run override.
    ///
    /// Returns true when the settings changed and need saving.
    pub fn remember_in(&self, settings: &mut Settings) -> bool {
        if self.source == FolderSource::Override
            || settings.mods_folder.as_deref() == Some(self.path())
        {
            return false;
        }
        settings.mods_folder = Some(self.path.clone());
        true
    }
}

/// Mods folder errors
#[derive(Debug, thiserror::Error)]
pub enum FolderError {
    #[error("Mods folder not found. Set it with `sdvmod folder set <DIR>` (usually Steam/steamapps/common/Stardew Valley/Mods)")]
    NotSet,

    #[error("Mods folder does not exist or is not a directory: {}", .0.display())]
    Missing(PathBuf),
}

/// Check that a user-chosen folder is usable
pub fn validate_folder(path: &Path) -> Result<(), FolderError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(FolderError::Missing(path.to_path_buf()))
    }
}

/// Resolve the Mods folder for this run.
///
/// `detect` is only called when neither the override nor the saved setting
/// is usable. The caller persists a `Detected` result with
/// [`TargetFolder::remember_in`].
pub fn resolve_target_folder(
    override_dir: Option<&Path>,
    settings: &Settings,
    detect: impl FnOnce() -> Option<PathBuf>,
) -> Result<TargetFolder, FolderError> {
    if let Some(dir) = override_dir {
        validate_folder(dir)?;
        return Ok(TargetFolder {
            path: dir.to_path_buf(),
            source: FolderSource::Override,
        });
    }

    if let Some(saved) = settings.valid_mods_folder() {
        return Ok(TargetFolder {
            path: saved.to_path_buf(),
            source: FolderSource::Saved,
        });
    }

    if let Some(stale) = &settings.mods_folder {
        warn!("Saved Mods folder no longer exists: {}", stale.display());
    }

    detect()
        .map(|path| TargetFolder {
            path,
            source: FolderSource::Detected,
        })
        .ok_or(FolderError::NotSet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_override_wins() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            mods_folder: Some(temp.path().to_path_buf()),
        };
        let other = temp.path().join("Other");
        std::fs::create_dir(&other).unwrap();

        let folder =
            resolve_target_folder(Some(&other), &settings, || panic!("no detect")).unwrap();

        assert_eq!(folder.path, other);
        assert_eq!(folder.source, FolderSource::Override);
    }

    #[test]
    fn test_missing_override_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = resolve_target_folder(
            Some(&temp.path().join("nope")),
            &Settings::default(),
            || None,
        );
        assert!(matches!(result, Err(FolderError::Missing(_))));
    }

    #[test]
    fn test_saved_folder_used() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            mods_folder: Some(temp.path().to_path_buf()),
        };

        let folder = resolve_target_folder(None, &settings, || panic!("no detect")).unwrap();

        assert_eq!(folder.source, FolderSource::Saved);
    }

    #[test]
    fn test_stale_saved_folder_falls_back_to_detection() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            mods_folder: Some(temp.path().join("deleted")),
        };
        let detected = temp.path().to_path_buf();

        let folder = resolve_target_folder(None, &settings, || Some(detected.clone())).unwrap();

        assert_eq!(folder.path, detected);
        assert_eq!(folder.source, FolderSource::Detected);
    }

    #[test]
    fn test_nothing_found() {
        let result = resolve_target_folder(None, &Settings::default(), || None);
        assert!(matches!(result, Err(FolderError::NotSet)));
    }

    #[test]
    fn test_detected_folder_is_remembered() {
        let temp = TempDir::new().unwrap();
        let mut settings = Settings {
            mods_folder: Some(temp.path().join("deleted")),
        };
        let detected = temp.path().to_path_buf();
        let folder = resolve_target_folder(None, &settings, || Some(detected)).unwrap();

        assert!(folder.remember_in(&mut settings));
        assert_eq!(settings.mods_folder.as_deref(), Some(temp.path()));
        assert!(!folder.remember_in(&mut settings));
    }

    #[test]
    fn test_saved_and_override_folders_change_nothing() {
        let temp = TempDir::new().unwrap();
        let other = temp.path().join("Other");
        std::fs::create_dir(&other).unwrap();
        let mut settings = Settings {
            mods_folder: Some(temp.path().to_path_buf()),
        };

        let saved = resolve_target_folder(None, &settings, || None).unwrap();
        assert!(!saved.remember_in(&mut settings));

        let overridden = resolve_target_folder(Some(&other), &settings, || None).unwrap();
        assert!(!overridden.remember_in(&mut settings));
        assert_eq!(settings.mods_folder.as_deref(), Some(temp.path()));
    }
}
