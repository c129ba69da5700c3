//! Process environment
//!
//! Everything a run needs besides the project itself: directory layout,
//! preferences, installed resamplers and singers. Built once at startup
//! and passed to each stage.

mod config;
mod preferences;

pub use config::{Config, HOME_ENV};
pub use preferences::Preferences;

use std::fs;

use crate::error::{Result, VoxportError};
use crate::resampler::{discover_resamplers, ResamplerRegistry};
use crate::singer::SingerManager;

pub struct Environment {
    pub config: Config,
    pub preferences: Preferences,
    pub resamplers: Box<dyn ResamplerRegistry>,
    pub singers: SingerManager,
}

impl Environment {
    /// Assemble an environment from parts, for callers that discover
    /// resamplers or singers themselves.
    pub fn new(
        config: Config,
        preferences: Preferences,
        resamplers: Box<dyn ResamplerRegistry>,
        singers: SingerManager,
    ) -> Self {
        Self {
            config,
            preferences,
            resamplers,
            singers,
        }
    }

    /// Prepare the cache, discover resamplers and load singers.
    ///
    /// Discovery leaves the configured default resampler untouched even if
    /// it isn't installed; the restored preferences are written back.
    pub fn init(config: Config) -> Result<Self> {
        if !config.cache_dir.exists() {
            fs::create_dir_all(&config.cache_dir).map_err(|e| {
                VoxportError::DirectoryCreateError {
                    path: config.cache_dir.clone(),
                    source: e,
                }
            })?;
        }

        let mut preferences = Preferences::load(&config.prefs_path)?;
        let resamplers = preferences
            .preserving_resampler(|prefs| discover_resamplers(&config.resamplers_dir, prefs))?;
        preferences.save(&config.prefs_path)?;

        let singers = SingerManager::load(&config.singers_dir)?;
        log::info!(
            "Environment ready: {} resamplers, {} singers, default resampler {:?}",
            resamplers.len(),
            singers.len(),
            preferences.resampler
        );

        Ok(Self::new(config, preferences, Box::new(resamplers), singers))
    }

    /// Name of the resampler used when a note doesn't override it.
    pub fn default_resampler(&self) -> &str {
        &self.preferences.resampler
    }
}
