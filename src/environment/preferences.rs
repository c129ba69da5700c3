//! Persisted user preferences.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxportError};

/// User preferences stored as `prefs.json` in the data directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Name of the default resampler.
    #[serde(default)]
    pub resampler: String,
}

impl Preferences {
    /// Load preferences, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| VoxportError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write preferences to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| VoxportError::DirectoryCreateError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| VoxportError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Run `f` and put the default resampler back the way it was afterwards.
    ///
    /// Resampler discovery picks a fallback default when the configured one
    /// is missing; the configured name must survive discovery so the
    /// environment check can report it. An empty preference means nothing
    /// was configured, and the fallback is kept.
    pub fn preserving_resampler<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.resampler.clone();
        let out = f(self);
        if !saved.is_empty() && self.resampler != saved {
            log::debug!(
                "Restoring resampler preference {:?} (discovery set {:?})",
                saved,
                self.resampler
            );
            self.resampler = saved;
        }
        out
    }
}
