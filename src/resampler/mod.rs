//! Resampler interfaces and discovery
//!
//! A resampler renders one phone: it reads a staged voicebank sample and
//! writes a pitch-shifted, time-stretched WAV. This module provides:
//! - `Resampler` trait for anything that can render a `ResamplerItem`
//! - `ResamplerRegistry` trait for looking resamplers up by name
//! - `ResamplerSet`, the registry built by scanning the resamplers directory

mod exe;
mod item;

pub use exe::ExeResampler;
pub use item::{tone_name, ResamplerItem};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::environment::Preferences;
use crate::error::{Result, VoxportError};

/// Extensions treated as runnable regardless of file mode.
const EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "bat", "sh"];

/// Something that renders one phone.
pub trait Resampler: Send + Sync {
    /// Name used in preferences and per-note overrides.
    fn name(&self) -> &str;

    /// Render `item` synchronously and return the produced file.
    fn run(&self, item: &ResamplerItem) -> Result<PathBuf>;
}

/// Lookup of resamplers by name.
pub trait ResamplerRegistry {
    fn find(&self, name: &str) -> Option<Arc<dyn Resampler>>;

    /// Names of all registered resamplers, in registration order.
    fn names(&self) -> Vec<&str>;
}

/// Resamplers available to this run.
#[derive(Default)]
pub struct ResamplerSet {
    resamplers: Vec<Arc<dyn Resampler>>,
}

impl ResamplerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resampler; a later one with the same name replaces it.
    pub fn register(&mut self, resampler: Arc<dyn Resampler>) {
        self.resamplers.retain(|r| r.name() != resampler.name());
        self.resamplers.push(resampler);
    }

    pub fn len(&self) -> usize {
        self.resamplers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resamplers.is_empty()
    }
}

impl ResamplerRegistry for ResamplerSet {
    fn find(&self, name: &str) -> Option<Arc<dyn Resampler>> {
        self.resamplers.iter().find(|r| r.name() == name).cloned()
    }

    fn names(&self) -> Vec<&str> {
        self.resamplers.iter().map(|r| r.name()).collect()
    }
}

/// Scan `dir` for resampler executables.
///
/// When the preferred resampler isn't among them, the preference is pointed
/// at the first one found. Callers that must keep the configured name wrap
/// this in [`Preferences::preserving_resampler`].
pub fn discover_resamplers(dir: &Path, prefs: &mut Preferences) -> Result<ResamplerSet> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| VoxportError::DirectoryCreateError {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| is_executable(p))
        .collect();
    paths.sort();

    let mut set = ResamplerSet::new();
    for path in paths {
        match ExeResampler::new(&path) {
            Some(resampler) => {
                log::info!("Found resampler {} at {}", resampler.name(), path.display());
                set.register(Arc::new(resampler));
            }
            None => log::warn!("Ignoring resampler with unusable name: {}", path.display()),
        }
    }

    if set.find(&prefs.resampler).is_none() {
        if let Some(first) = set.names().first() {
            log::info!(
                "Default resampler {:?} not installed, using {}",
                prefs.resampler,
                first
            );
            prefs.resampler = first.to_string();
        }
    }
    Ok(set)
}

fn is_executable(path: &Path) -> bool {
    let Ok(meta) = fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    let by_extension = path
        .extension()
        .map(|e| {
            let e = e.to_string_lossy().to_lowercase();
            EXECUTABLE_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false);
    by_extension || has_exec_bit(&meta)
}

#[cfg(unix)]
fn has_exec_bit(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_exec_bit(_meta: &fs::Metadata) -> bool {
    false
}
