//! Path helpers for archive entries and mod folders
//!
//! Mod archives are frequently packed on Windows, so entry names may use
//! backslashes. This module handles:
//! - Converting `\` to `/` for archive entry names
//! - Splitting off the top-level segment of an entry
//! - Case-insensitive child lookups (manifest.json vs Manifest.json)
//! - Deriving a mod folder name from an archive file name

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Convert Windows path separators to forward slashes
/// `CoolMod\assets\data.json` -> `CoolMod/assets/data.json`
pub fn to_linux_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Top-level segment of an archive entry name, if the entry is nested.
///
/// `CoolMod/manifest.json` -> `Some("CoolMod")`, `CoolMod/` -> `Some("CoolMod")`,
/// `readme.txt` -> `None`. Only a plain folder name counts: an empty segment
/// (leading slash), `.` or `..` is reported as `None`.
pub fn top_level_segment(entry: &str) -> Option<&str> {
    let (top, _) = entry.split_once('/')?;
    if is_single_component(top) {
        Some(top)
    } else {
        None
    }
}

/// Folder name for an archive: its file name minus the final extension
/// `Downloads/CoolMod 1.2.zip` -> `CoolMod 1.2`
pub fn archive_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
}

/// Check for a `.zip` extension (case-insensitive)
pub fn is_zip_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Find a direct child of `dir` whose name matches `name` case-insensitively.
///
/// An exact match wins over a case-folded one.
pub fn find_child_case_insensitive(dir: &Path, name: &str) -> Option<PathBuf> {
    let exact = dir.join(name);
    if exact.exists() {
        return Some(exact);
    }

    let target_lower = name.to_lowercase();
    std::fs::read_dir(dir).ok()?.find_map(|entry| {
        let entry = entry.ok()?;
        let file_name = entry.file_name();
        if file_name.to_string_lossy().to_lowercase() == target_lower {
            Some(entry.path())
        } else {
            None
        }
    })
}

/// True if `name` is exactly one normal path component (no separators, `..`, or roots)
pub fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Folder name of a path for display
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_to_linux_path() {
        assert_eq!(to_linux_path("CoolMod\\assets\\data.json"), "CoolMod/assets/data.json");
        assert_eq!(to_linux_path("already/linux/path"), "already/linux/path");
        assert_eq!(to_linux_path("mixed\\path/style"), "mixed/path/style");
    }

    #[test]
    fn test_top_level_segment() {
        assert_eq!(top_level_segment("CoolMod/manifest.json"), Some("CoolMod"));
        assert_eq!(top_level_segment("CoolMod/"), Some("CoolMod"));
        assert_eq!(top_level_segment("CoolMod/assets/a.png"), Some("CoolMod"));
        assert_eq!(top_level_segment("readme.txt"), None);
        assert_eq!(top_level_segment("/abs/file"), None);
        assert_eq!(top_level_segment("./a.json"), None);
        assert_eq!(top_level_segment("../a.json"), None);
    }

    #[test]
    fn test_archive_stem() {
        assert_eq!(archive_stem(Path::new("/tmp/CoolMod.zip")).as_deref(), Some("CoolMod"));
        assert_eq!(archive_stem(Path::new("Mod.v1.2.zip")).as_deref(), Some("Mod.v1.2"));
        assert_eq!(archive_stem(Path::new("noext")).as_deref(), Some("noext"));
    }

    #[test]
    fn test_is_zip_path() {
        assert!(is_zip_path(Path::new("a.zip")));
        assert!(is_zip_path(Path::new("A.ZIP")));
        assert!(!is_zip_path(Path::new("a.7z")));
        assert!(!is_zip_path(Path::new("zip")));
    }

    #[test]
    fn test_find_child_case_insensitive() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("Manifest.JSON"), "{}").unwrap();

        let found = find_child_case_insensitive(temp.path(), "manifest.json").unwrap();
        assert_eq!(found.file_name().unwrap(), "Manifest.JSON");
        assert!(find_child_case_insensitive(temp.path(), "content.json").is_none());
    }

    #[test]
    fn test_is_single_component() {
        assert!(is_single_component("CoolMod"));
        assert!(is_single_component("Cool Mod 1.2"));
        assert!(!is_single_component("../CoolMod"));
        assert!(!is_single_component("a/b"));
        assert!(!is_single_component("/abs"));
        assert!(!is_single_component(".."));
        assert!(!is_single_component(""));
    }
}
