//! CLI Command Implementations

use std::path::Path;

use log::info;

use crate::environment::Environment;
use crate::error::Result;
use crate::project::load_project;
use crate::render::{
    check_environment, enumerate_phrases, export_dir_for, resample_phones, write_results,
    ExportSummary,
};

/// Render every phone of the project at `path` and export the results to
/// the `Export` folder beside it.
pub fn export_project(env: &Environment, path: &Path) -> Result<ExportSummary> {
    info!("Exporting project: {}", path.display());

    let project = load_project(path)?;
    check_environment(env, &project)?;

    let phrases = enumerate_phrases(&project, &env.singers);
    info!("{} phrases to render", phrases.len());
    let results = resample_phones(env, &phrases)?;

    let export_dir = export_dir_for(path);
    let summary = write_results(&results, &export_dir)?;

    println!(
        "Exported {} files to {}",
        summary.written,
        export_dir.display()
    );
    if summary.failed > 0 {
        println!("{} files could not be written", summary.failed);
    }
    Ok(summary)
}
