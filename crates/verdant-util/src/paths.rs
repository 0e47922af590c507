//! Default paths for verdant components
//!
//! Paths are user-writable by default (no root required):
//! - Data: `$XDG_DATA_HOME/verdant` or `~/.local/share/verdant`

use std::path::PathBuf;

/// Application subdirectory name
const APP_DIR: &str = "verdant";

/// Default data directory: `$XDG_DATA_HOME/verdant`, falling back to
/// `~/.local/share/verdant`. Flag and env-var overrides are the caller's
/// concern; this function never reads them.
pub fn default_data_dir() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".local/share").join(APP_DIR)
}
