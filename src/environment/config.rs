//! Data directory layout.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "VOXPORT_HOME";

pub const CACHE_DIR: &str = "Cache";
pub const RESAMPLERS_DIR: &str = "Resamplers";
pub const SINGERS_DIR: &str = "Singers";
pub const PREFS_FILE: &str = "prefs.json";

/// Locations of everything the tool reads or writes outside the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub resamplers_dir: PathBuf,
    pub singers_dir: PathBuf,
    pub prefs_path: PathBuf,
}

impl Config {
    /// Lay out the standard subdirectories under `data_dir`.
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            cache_dir: data_dir.join(CACHE_DIR),
            resamplers_dir: data_dir.join(RESAMPLERS_DIR),
            singers_dir: data_dir.join(SINGERS_DIR),
            prefs_path: data_dir.join(PREFS_FILE),
            data_dir,
        }
    }

    /// `$VOXPORT_HOME`, else the directory holding the executable, else the
    /// working directory.
    pub fn from_env() -> Self {
        if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Self::with_data_dir(home);
        }
        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self::with_data_dir(exe_dir.unwrap_or_else(|| PathBuf::from(".")))
    }
}
