//! Mods folder auto-discovery
//!
//! Probes a fixed list of conventional install locations, first existing
//! directory wins:
//! 1. Windows Steam installs on drives C:, D:, E: (`Program Files (x86)` before `Program Files`)
//! 2. `%APPDATA%\StardewValley\Mods`
//! 3. Steam libraries under `$HOME` on Linux and macOS

pub mod steam;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Game folder name inside `steamapps/common`
pub const GAME_FOLDER: &str = "Stardew Valley";

/// SMAPI's mod folder inside the game folder
pub const MODS_FOLDER: &str = "Mods";

const WINDOWS_DRIVES: [&str; 3] = ["C:", "D:", "E:"];
const PROGRAM_FILES: [&str; 2] = ["Program Files (x86)", "Program Files"];

/// Windows candidates, in search order
pub fn windows_candidates(appdata: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = WINDOWS_DRIVES
        .iter()
        .flat_map(|drive| {
            PROGRAM_FILES.iter().map(move |program_files| {
                PathBuf::from(format!(
                    r"{drive}\{program_files}\Steam\steamapps\common\{GAME_FOLDER}\{MODS_FOLDER}"
                ))
            })
        })
        .collect();

    if let Some(appdata) = appdata {
        candidates.push(appdata.join("StardewValley").join(MODS_FOLDER));
    }

    candidates
}

/// Unix candidates under `home`: each Steam root, then libraries it declares
pub fn unix_candidates(home: &Path) -> Vec<PathBuf> {
    let mut libraries = Vec::new();
    for root in steam::find_steam_roots(home) {
        let extra = steam::library_folders(&root);
        libraries.push(root);
        libraries.extend(extra);
    }

    let mut candidates: Vec<PathBuf> = Vec::new();
    for library in libraries {
        let candidate = library
            .join("steamapps/common")
            .join(GAME_FOLDER)
            .join(MODS_FOLDER);
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Candidates for the current platform, in search order
pub fn candidate_paths() -> Vec<PathBuf> {
    if cfg!(windows) {
        let appdata = std::env::var_os("APPDATA").map(PathBuf::from);
        windows_candidates(appdata.as_deref())
    } else {
        match std::env::var_os("HOME") {
            Some(home) => unix_candidates(Path::new(&home)),
            None => Vec::new(),
        }
    }
}

/// First candidate that exists and is a directory
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates
        .iter()
        .inspect(|p| debug!("Probing {}", p.display()))
        .find(|p| p.is_dir())
        .cloned()
}

/// Auto-detect the Mods folder
pub fn find_mods_folder() -> Option<PathBuf> {
    let found = first_existing(&candidate_paths());
    if let Some(ref path) = found {
        info!("Detected Mods folder: {}", path.display());
    }
    found
}
