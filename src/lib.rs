//! sdvmod - Stardew Valley mod installer
//!
//! Drop a mod zip in, get a mod folder out. The Mods folder itself is the
//! registry: every subdirectory is an installed mod.

pub mod game_finder;
pub mod installer;
pub mod paths;
pub mod registry;
pub mod settings;
pub mod status;
pub mod target;

pub use installer::{install, install_in_background, InstallError, InstalledLocation};
pub use registry::{list_mods, remove_mods, InstalledMod};
pub use target::{resolve_target_folder, TargetFolder};
