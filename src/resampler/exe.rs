//! Resamplers run as external executables.
//!
//! Arguments follow the UTAU convention:
//! `in out tone velocity flags offset length consonant cutoff volume
//! modulation !tempo pitchbend`.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{Resampler, ResamplerItem};
use crate::error::{Result, VoxportError};

/// Flat pitch curve: one zero-cent point.
const FLAT_PITCHBEND: &str = "AA";

/// An executable resampler found on disk.
#[derive(Debug, Clone)]
pub struct ExeResampler {
    name: String,
    path: PathBuf,
}

impl ExeResampler {
    /// Wrap the executable at `path`; its file name becomes the resampler name.
    pub fn new(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_string();
        Some(Self {
            name,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn args(item: &ResamplerItem) -> Vec<String> {
        vec![
            item.input_temp.to_string_lossy().to_string(),
            item.output_file.to_string_lossy().to_string(),
            super::tone_name(item.tone),
            format!("{}", item.velocity),
            item.flags.clone(),
            format!("{:.3}", item.offset),
            format!("{:.0}", item.required_length),
            format!("{:.3}", item.consonant),
            format!("{:.3}", item.cutoff),
            format!("{}", item.volume),
            format!("{}", item.modulation),
            format!("!{}", item.tempo),
            FLAT_PITCHBEND.to_string(),
        ]
    }
}

impl Resampler for ExeResampler {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, item: &ResamplerItem) -> Result<PathBuf> {
        let args = Self::args(item);
        log::debug!("{} {}", self.path.display(), args.join(" "));

        let output = Command::new(&self.path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| VoxportError::ResamplerFailed {
                resampler: self.name.clone(),
                phoneme: item.phoneme.clone(),
                reason: format!("could not start {}: {}", self.path.display(), e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            log::debug!("{}: {}", self.name, stdout.trim());
        }
        if !output.status.success() {
            return Err(VoxportError::ResamplerFailed {
                resampler: self.name.clone(),
                phoneme: item.phoneme.clone(),
                reason: format!(
                    "exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        Ok(item.output_file.clone())
    }
}
