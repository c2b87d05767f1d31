//! Mod archive installer
//!
//! Installs one .zip into the Mods folder:
//! 1. Open    - check the archive exists and is a real ZIP
//! 2. Layout  - shared top-level folder, or loose files
//! 3. Place   - top folder goes straight into Mods, loose files get `Mods/<archive name>`
//! 4. Extract - write every entry, no rollback on failure

pub mod config;
pub mod extract;
pub mod layout;

pub use config::{ConflictPolicy, ExtractCause, InstallError, InstallRequest};
pub use layout::ArchiveLayout;

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use zip::ZipArchive;

use crate::paths::archive_stem;

/// Progress callback for reporting installation milestones
pub type ProgressCallback = Arc<dyn Fn(InstallProgress) + Send + Sync>;

/// Installation milestones. There is no byte-level progress.
#[derive(Debug, Clone)]
pub enum InstallProgress {
    /// Opening and inspecting the archive
    Opening { archive: PathBuf },
    /// Layout decided, writing files
    Extracting {
        archive: PathBuf,
        destination: PathBuf,
    },
    /// All entries written
    Finished { archive: PathBuf, mod_dir: PathBuf },
}

/// Where an archive ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledLocation {
    /// The archive that was installed
    pub archive: PathBuf,
    /// The mod's folder inside the Mods folder
    pub mod_dir: PathBuf,
    /// Layout that decided the destination
    pub layout: ArchiveLayout,
    /// Extraction statistics
    pub stats: extract::ExtractStats,
}

impl InstalledLocation {
    /// Folder name of the installed mod
    pub fn mod_name(&self) -> String {
        crate::paths::display_name(&self.mod_dir)
    }
}

/// Single-archive installer
pub struct Installer {
    request: InstallRequest,
    progress_callback: Option<ProgressCallback>,
}

impl Installer {
    pub fn new(request: InstallRequest) -> Self {
        Self {
            request,
            progress_callback: None,
        }
    }

    /// Set progress callback
    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.progress_callback = Some(callback);
    }

    pub fn request(&self) -> &InstallRequest {
        &self.request
    }

    fn report_progress(&self, progress: InstallProgress) {
        if let Some(ref callback) = self.progress_callback {
            callback(progress);
        }
    }

    /// Run the installation on the current thread
    pub fn run(&self) -> Result<InstalledLocation, InstallError> {
        let archive_path = &self.request.archive_path;
        let target = &self.request.target_folder;

        self.report_progress(InstallProgress::Opening {
            archive: archive_path.clone(),
        });
        self.request.validate()?;

        let file = File::open(archive_path)
            .map_err(|e| InstallError::extraction(archive_path, e))?;
        let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| {
            InstallError::InvalidArchive {
                path: archive_path.clone(),
                reason: e.to_string(),
            }
        })?;

        let entries = extract::list_entries(&mut archive)
            .map_err(|e| InstallError::extraction(archive_path, e))?;
        let layout = layout::detect_layout(&entries);

        let (extract_root, mod_dir) = match &layout {
            ArchiveLayout::SharedTopFolder(top) => (target.clone(), target.join(top)),
            ArchiveLayout::Loose => {
                let name = archive_stem(archive_path).ok_or_else(|| {
                    InstallError::InvalidArchive {
                        path: archive_path.clone(),
                        reason: "archive has no usable file name".to_string(),
                    }
                })?;
                let mod_dir = target.join(name);
                (mod_dir.clone(), mod_dir)
            }
        };

        if mod_dir.exists() {
            match self.request.conflict_policy {
                ConflictPolicy::Reject => return Err(InstallError::DestinationExists(mod_dir)),
                ConflictPolicy::Overlay => {
                    warn!("Overlaying existing mod folder: {}", mod_dir.display());
                }
            }
        }

        if !layout.has_top_folder() {
            fs::create_dir_all(&mod_dir).map_err(|e| InstallError::extraction(archive_path, e))?;
        }

        info!(
            "Installing {} ({} entries, {:?}) into {}",
            archive_path.display(),
            entries.len(),
            layout,
            extract_root.display()
        );
        self.report_progress(InstallProgress::Extracting {
            archive: archive_path.clone(),
            destination: extract_root.clone(),
        });

        let stats = extract::extract_to_dir(&mut archive, &extract_root)
            .map_err(|e| InstallError::extraction(archive_path, e))?;

        info!(
            "Installed {}: {} files, {} dirs, {} skipped",
            mod_dir.display(),
            stats.files,
            stats.dirs,
            stats.skipped
        );
        self.report_progress(InstallProgress::Finished {
            archive: archive_path.clone(),
            mod_dir: mod_dir.clone(),
        });

        Ok(InstalledLocation {
            archive: archive_path.clone(),
            mod_dir,
            layout,
            stats,
        })
    }

    /// Run the installation on a blocking worker thread
    pub async fn run_in_background(self) -> Result<InstalledLocation, InstallError> {
        let archive = self.request.archive_path.clone();
        tokio::task::spawn_blocking(move || self.run())
            .await
            .map_err(|e| InstallError::extraction(&archive, e))?
    }
}

/// Install `archive_path` into `target_folder` with the default overlay policy
pub fn install(
    archive_path: impl Into<PathBuf>,
    target_folder: impl Into<PathBuf>,
) -> Result<InstalledLocation, InstallError> {
    Installer::new(InstallRequest::new(archive_path, target_folder)).run()
}

/// Install on a blocking worker, reporting milestones through `progress`
pub async fn install_in_background(
    request: InstallRequest,
    progress: Option<ProgressCallback>,
) -> Result<InstalledLocation, InstallError> {
    let mut installer = Installer::new(request);
    if let Some(callback) = progress {
        installer.set_progress_callback(callback);
    }
    installer.run_in_background().await
}
