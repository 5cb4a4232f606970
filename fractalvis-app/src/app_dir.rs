//! Where FractalVis keeps its files.
//!
//! Preferences go to the platform config directory when one exists, and next
//! to the executable otherwise (portable installs).

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Directory for the preferences file.
pub fn config_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "FractalVis")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(exe_directory)
}
