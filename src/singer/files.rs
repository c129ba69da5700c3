//! Staging voicebank samples for resamplers.
//!
//! Resamplers read their input from a temp copy and may write analysis
//! files (frequency tables and the like) next to it. Those are copied back to
//! the voicebank so later runs can reuse them.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{Result, VoxportError};

/// Suffixes of analysis files resamplers keep beside a sample.
pub const META_SUFFIXES: &[&str] = &["_wav.frq", ".frq", "_wav.llsm", "_wav.dio"];

/// Temp location in `cache_dir` for a singer's sample.
pub fn source_temp_path(cache_dir: &Path, singer_id: &str, source: &Path) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(singer_id.as_bytes());
    hasher.update([0]);
    hasher.update(source.to_string_lossy().as_bytes());
    let mut digest = format!("{:x}", hasher.finalize());
    digest.truncate(16);
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "wav".to_string());
    cache_dir.join(format!("src-{}.{}", digest, ext))
}

/// Copy `source` and any analysis files beside it to `temp`.
///
/// An existing temp copy is left alone.
pub fn copy_source_temp(source: &Path, temp: &Path) -> Result<()> {
    if !source.exists() {
        return Err(VoxportError::FileReadError {
            path: source.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }
    if !temp.exists() {
        copy_file(source, temp)?;
    }
    for suffix in META_SUFFIXES {
        let meta = meta_path(source, suffix);
        let temp_meta = meta_path(temp, suffix);
        if meta.exists() && !temp_meta.exists() {
            copy_file(&meta, &temp_meta)?;
        }
    }
    Ok(())
}

/// Copy analysis files the resampler left beside `temp` back next to
/// `source`, unless the voicebank already has them.
pub fn copy_back_meta_files(source: &Path, temp: &Path) -> Result<()> {
    for suffix in META_SUFFIXES {
        let temp_meta = meta_path(temp, suffix);
        let meta = meta_path(source, suffix);
        if temp_meta.exists() && !meta.exists() {
            log::debug!("Copying back {}", meta.display());
            copy_file(&temp_meta, &meta)?;
        }
    }
    Ok(())
}

/// `dir/stem.wav` with suffix `_wav.frq` becomes `dir/stem_wav.frq`.
fn meta_path(sample: &Path, suffix: &str) -> PathBuf {
    let stem = sample
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    sample.with_file_name(format!("{}{}", stem, suffix))
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| VoxportError::DirectoryCreateError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::copy(from, to).map_err(|e| VoxportError::FileWriteError {
        path: to.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
