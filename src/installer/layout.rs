//! Archive layout detection
//!
//! Mod authors package archives two ways: everything inside one folder
//! (`CoolMod/manifest.json`, `CoolMod/assets/...`) or loose files at the
//! archive root. The first can be extracted straight into the Mods folder,
//! the second needs a folder of its own.

use crate::paths::top_level_segment;

/// How an archive's entries are arranged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveLayout {
    /// Every entry lives under this one top-level folder
    SharedTopFolder(String),
    /// Entries sit at the root or under several top-level folders
    Loose,
}

impl ArchiveLayout {
    pub fn has_top_folder(&self) -> bool {
        matches!(self, ArchiveLayout::SharedTopFolder(_))
    }
}

/// Decide the layout from entry names (forward slashes, archive order).
///
/// The first entry picks the candidate folder; every later entry must start
/// with `<folder>/`. A single-entry archive is never a shared folder.
pub fn detect_layout(entries: &[String]) -> ArchiveLayout {
    if entries.len() < 2 {
        return ArchiveLayout::Loose;
    }

    let Some(top) = top_level_segment(&entries[0]) else {
        return ArchiveLayout::Loose;
    };

    let prefix = format!("{top}/");
    if entries[1..].iter().all(|entry| entry.starts_with(&prefix)) {
        ArchiveLayout::SharedTopFolder(top.to_string())
    } else {
        ArchiveLayout::Loose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_shared_top_folder() {
        let entries = names(&["CoolMod/assets.json", "CoolMod/manifest.json"]);
        assert_eq!(
            detect_layout(&entries),
            ArchiveLayout::SharedTopFolder("CoolMod".into())
        );
    }

    #[test]
    fn test_directory_entry_first() {
        let entries = names(&["CoolMod/", "CoolMod/manifest.json", "CoolMod/assets/a.png"]);
        assert_eq!(
            detect_layout(&entries),
            ArchiveLayout::SharedTopFolder("CoolMod".into())
        );
    }

    #[test]
    fn test_loose_files() {
        assert_eq!(detect_layout(&names(&["a.json", "b.json"])), ArchiveLayout::Loose);
    }

    #[test]
    fn test_multiple_top_folders() {
        let entries = names(&["ModA/manifest.json", "ModB/manifest.json"]);
        assert_eq!(detect_layout(&entries), ArchiveLayout::Loose);
    }

    #[test]
    fn test_prefix_must_end_at_separator() {
        let entries = names(&["Cool/manifest.json", "CoolMod/manifest.json"]);
        assert_eq!(detect_layout(&entries), ArchiveLayout::Loose);
    }

    #[test]
    fn test_dot_segments_are_not_a_folder() {
        assert_eq!(detect_layout(&names(&["./a.json", "./b.json"])), ArchiveLayout::Loose);
        assert_eq!(detect_layout(&names(&["../a.json", "../b.json"])), ArchiveLayout::Loose);
    }

    #[test]
    fn test_single_entry_is_loose() {
        assert_eq!(detect_layout(&names(&["CoolMod/manifest.json"])), ArchiveLayout::Loose);
        assert_eq!(detect_layout(&names(&["readme.txt"])), ArchiveLayout::Loose);
    }

    #[test]
    fn test_empty_archive_is_loose() {
        assert_eq!(detect_layout(&[]), ArchiveLayout::Loose);
        assert!(!ArchiveLayout::Loose.has_top_folder());
    }
}
