//! Mod folder removal.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Why a single mod could not be removed
#[derive(Debug, thiserror::Error)]
pub enum DeleteError {
    #[error("Mod not found (already removed?): {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to delete {}: {source}", path.display())]
    Failed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of removing one selected mod
#[derive(Debug)]
pub struct RemovalOutcome {
    pub path: PathBuf,
    pub result: Result<(), DeleteError>,
}

/// Results of a removal batch, in selection order
#[derive(Debug, Default)]
pub struct RemovalReport {
    pub outcomes: Vec<RemovalOutcome>,
}

impl RemovalReport {
    pub fn removed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.removed()
    }

    pub fn all_removed(&self) -> bool {
        self.failed() == 0
    }

    /// Summary line: "Removed: 2, failed: 1"
    pub fn summary(&self) -> String {
        format!("Removed: {}, failed: {}", self.removed(), self.failed())
    }
}

/// Recursively delete one mod folder
pub fn remove_mod(path: &Path) -> Result<(), DeleteError> {
    if !path.is_dir() {
        return Err(DeleteError::NotFound(path.to_path_buf()));
    }
    fs::remove_dir_all(path).map_err(|source| DeleteError::Failed {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Removed mod folder {}", path.display());
    Ok(())
}

/// Delete each selected mod folder in order. A failure never stops the batch.
pub fn remove_mods<P: AsRef<Path>>(paths: &[P]) -> RemovalReport {
    let outcomes = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let result = remove_mod(path);
            if let Err(ref e) = result {
                warn!("{}", e);
            }
            RemovalOutcome {
                path: path.to_path_buf(),
                result,
            }
        })
        .collect();

    RemovalReport { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_mods() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("ModA");
        let b = temp.path().join("ModB");
        fs::create_dir_all(a.join("assets")).unwrap();
        fs::write(a.join("assets/data.json"), "{}").unwrap();
        fs::create_dir(&b).unwrap();

        let report = remove_mods(&[&a, &b]);

        assert_eq!(report.removed(), 2);
        assert!(report.all_removed());
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn test_missing_entry_does_not_stop_batch() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("Gone");
        let present = temp.path().join("Present");
        fs::create_dir(&present).unwrap();

        let report = remove_mods(&[gone.clone(), present.clone()]);

        assert_eq!(report.removed(), 1);
        assert_eq!(report.failed(), 1);
        assert!(matches!(&report.outcomes[0].result, Err(DeleteError::NotFound(p)) if *p == gone));
        assert!(report.outcomes[1].result.is_ok());
        assert!(!present.exists());
        assert_eq!(report.summary(), "Removed: 1, failed: 1");
    }

    #[test]
    fn test_file_is_not_a_mod() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("notes.txt");
        fs::write(&file, "keep me").unwrap();

        assert!(matches!(remove_mod(&file), Err(DeleteError::NotFound(_))));
        assert!(file.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_delete_does_not_stop_batch() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("Locked");
        let stuck = locked.join("Stuck");
        let free = temp.path().join("Free");
        fs::create_dir_all(&stuck).unwrap();
        fs::create_dir(&free).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind a privileged user
        if fs::File::create(locked.join("write_check")).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let report = remove_mods(&[stuck.clone(), free.clone()]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(
            &report.outcomes[0].result,
            Err(DeleteError::Failed { path, .. }) if *path == stuck
        ));
        assert!(report.outcomes[1].result.is_ok());
        assert!(stuck.exists());
        assert!(!free.exists());
        assert_eq!(report.summary(), "Removed: 1, failed: 1");
    }
}
