//! Installation request and error types
//!
//! Defines what a single archive installation needs and how it can fail.

use std::path::{Path, PathBuf};

/// What to do when the mod folder an archive resolves to already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Extract on top of the existing folder, overwriting same-named files
    #[default]
    Overlay,
    /// Refuse to install and leave the existing folder untouched
    Reject,
}

/// One archive installation into a Mods folder
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Path to the .zip archive
    pub archive_path: PathBuf,

    /// Mods folder that receives the mod's folder
    pub target_folder: PathBuf,

    /// Behaviour when the destination mod folder already exists
    pub conflict_policy: ConflictPolicy,
}

impl InstallRequest {
    pub fn new(archive_path: impl Into<PathBuf>, target_folder: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: archive_path.into(),
            target_folder: target_folder.into(),
            conflict_policy: ConflictPolicy::default(),
        }
    }

    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// Validate the request before touching the archive contents
    pub fn validate(&self) -> Result<(), InstallError> {
        if !self.archive_path.exists() {
            return Err(InstallError::NotFound(self.archive_path.clone()));
        }

        if !self.target_folder.is_dir() {
            return Err(InstallError::FolderMissing(self.target_folder.clone()));
        }

        Ok(())
    }
}

/// Installation errors
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    #[error("Archive not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a valid ZIP archive: {} ({reason})", path.display())]
    InvalidArchive { path: PathBuf, reason: String },

    #[error("Mods folder is not set or does not exist: {}", .0.display())]
    FolderMissing(PathBuf),

    #[error("Mod folder already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Failed to extract {}: {source}", archive.display())]
    ExtractionFailed {
        archive: PathBuf,
        #[source]
        source: ExtractCause,
    },
}

impl InstallError {
    pub(crate) fn extraction(archive: &Path, source: impl Into<ExtractCause>) -> Self {
        InstallError::ExtractionFailed {
            archive: archive.to_path_buf(),
            source: source.into(),
        }
    }
}

/// Underlying cause of an extraction failure
#[derive(Debug, thiserror::Error)]
pub enum ExtractCause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error("install worker stopped: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_missing_archive() {
        let temp = TempDir::new().unwrap();
        let request = InstallRequest::new(temp.path().join("missing.zip"), temp.path());

        assert!(matches!(request.validate(), Err(InstallError::NotFound(_))));
    }

    #[test]
    fn test_validate_missing_target() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("mod.zip");
        std::fs::write(&archive, b"not checked here").unwrap();
        let request = InstallRequest::new(&archive, temp.path().join("Mods"));

        assert!(matches!(request.validate(), Err(InstallError::FolderMissing(_))));
    }

    #[test]
    fn test_default_policy_is_overlay() {
        let request = InstallRequest::new("a.zip", "Mods");
        assert_eq!(request.conflict_policy, ConflictPolicy::Overlay);

        let request = request.with_conflict_policy(ConflictPolicy::Reject);
        assert_eq!(request.conflict_policy, ConflictPolicy::Reject);
    }
}
