//! Filesystem locations used by navmenu.

use std::path::PathBuf;

use dirs_next::{config_dir, data_dir, home_dir};

/// Directory name used under the platform config and data roots.
pub const APP_DIR_NAME: &str = "navmenu";

/// Expands a leading `~` to the current user's home directory.
///
/// When the home directory cannot be resolved the path is returned with the
/// tilde left in place.
pub fn expand_tilde(path: &str) -> PathBuf {
    let trimmed = path.trim();
    let home = || home_dir().unwrap_or_else(|| PathBuf::from("~"));
    if trimmed == "~" {
        return home();
    }
    match trimmed.strip_prefix("~/").or_else(|| trimmed.strip_prefix("~\\")) {
        Some(rest) => home().join(rest),
        None => PathBuf::from(trimmed),
    }
}

/// `~/.config/navmenu` on most platforms.
pub fn config_root() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

/// Where the TUI writes its log file while it owns the terminal.
pub fn log_file_path() -> PathBuf {
    data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join("navmenu.log")
}
