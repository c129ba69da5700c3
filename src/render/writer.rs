//! Copying rendered phones into the export folder.

use std::fs;
use std::path::{Path, PathBuf};

use super::NoteResult;
use crate::error::{Result, VoxportError};

/// Name of the export folder created beside the project file.
pub const EXPORT_DIR: &str = "Export";

/// Outcome of [`write_results`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: usize,
    pub failed: usize,
}

/// `<position:06>_<lead_in:06>_<phoneme>.wav`
///
/// Path separators in the phoneme become `_` so the file stays in the
/// export folder.
pub fn export_file_name(result: &NoteResult) -> String {
    let phoneme = result.phoneme.replace(&['/', '\\'][..], "_");
    format!(
        "{:06}_{:06}_{}.wav",
        result.position, result.lead_in, phoneme
    )
}

/// Export folder for a project file.
pub fn export_dir_for(project_path: &Path) -> PathBuf {
    project_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(EXPORT_DIR)
}

/// Copy every result into `dir`, replacing files of the same name.
///
/// A failed copy is reported and skipped; only failing to create `dir`
/// aborts.
pub fn write_results(results: &[NoteResult], dir: &Path) -> Result<ExportSummary> {
    fs::create_dir_all(dir).map_err(|e| VoxportError::DirectoryCreateError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut summary = ExportSummary::default();
    for result in results {
        let target = dir.join(export_file_name(result));
        match fs::copy(&result.file, &target) {
            Ok(_) => summary.written += 1,
            Err(e) => {
                log::error!(
                    "Failed to copy {} to {}: {}",
                    result.file.display(),
                    target.display(),
                    e
                );
                eprintln!("Failed to write {}: {}", target.display(), e);
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}
