//! CLI Module
//!
//! Command-line interface for Voxport.

pub mod commands;

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::{Result, VoxportError};
use crate::project::PROJECT_EXTENSION;

/// Usage line printed for any argument error.
pub const USAGE: &str = "Usage: voxport <project.ustx>";

/// Voxport - render every phone of a singing project through a resampler
#[derive(Parser, Debug)]
#[command(name = "voxport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Project file to export
    pub project: PathBuf,
}

/// The project argument must be an existing `.ustx` file.
pub fn validate_project_path(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(VoxportError::ProjectNotFound {
            path: path.to_path_buf(),
        });
    }
    if path.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION) {
        return Err(VoxportError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
