//! Steam library detection for Unix hosts
//!
//! Finds Steam installations under the user's home directory and the extra
//! library folders listed in `steamapps/libraryfolders.vdf`.

use std::fs;
use std::path::{Path, PathBuf};

/// Conventional Steam roots relative to `$HOME`, in search order
pub fn steam_root_candidates(home: &Path) -> Vec<PathBuf> {
    vec![
        home.join(".local/share/Steam"),
        home.join(".steam/debian-installation"),
        home.join(".steam/steam"),
        home.join(".var/app/com.valvesoftware.Steam/data/Steam"),
        home.join(".var/app/com.valvesoftware.Steam/.local/share/Steam"),
        home.join("snap/steam/common/.local/share/Steam"),
        home.join("Library/Application Support/Steam"),
    ]
}

/// Steam roots under `home` that actually contain a steamapps folder
pub fn find_steam_roots(home: &Path) -> Vec<PathBuf> {
    steam_root_candidates(home)
        .into_iter()
        .filter(|p| p.join("steamapps").is_dir())
        .collect()
}

/// Library paths from a libraryfolders.vdf file
pub fn parse_library_folders(raw: &str) -> Vec<PathBuf> {
    raw.lines()
        .map(str::trim)
        .filter(|line| line.starts_with("\"path\""))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split('"').collect();
            parts
                .get(3)
                .filter(|p| !p.is_empty())
                .map(|p| PathBuf::from(p.replace("\\\\", "\\")))
        })
        .collect()
}

/// Extra libraries declared by a Steam root (empty if there is no vdf)
pub fn library_folders(steam_root: &Path) -> Vec<PathBuf> {
    let vdf = steam_root.join("steamapps/libraryfolders.vdf");
    match fs::read_to_string(&vdf) {
        Ok(raw) => parse_library_folders(&raw),
        Err(_) => Vec::new(),
    }
}
