//! Rendering
//!
//! Turns a loaded project into exported phone samples:
//! - `phrase`: split voice parts into phrases of phones
//! - `check`: make sure singers and the resampler are installed
//! - `resample_phones`: run the resampler for every phone, in order
//! - `writer`: copy the results into the export folder

mod check;
mod phrase;
mod writer;

pub use check::check_environment;
pub use phrase::{build_phrases, enumerate_phrases, phone_pairs, Phone, Phrase};
pub use writer::{export_dir_for, export_file_name, write_results, ExportSummary, EXPORT_DIR};

use std::path::PathBuf;

use crate::environment::Environment;
use crate::error::{Result, VoxportError};
use crate::resampler::ResamplerItem;
use crate::singer::{copy_back_meta_files, copy_source_temp};

/// A rendered phone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteResult {
    pub lead_in: i32,
    pub position: i32,
    pub phoneme: String,
    /// Rendered audio; always exists when the result is created.
    pub file: PathBuf,
}

/// Render every phone of `phrases` in order.
///
/// The first failure aborts the whole run.
pub fn resample_phones(env: &Environment, phrases: &[Phrase]) -> Result<Vec<NoteResult>> {
    let mut results = Vec::new();
    for (phrase, phone) in phone_pairs(phrases) {
        let item = ResamplerItem::new(env, phrase, phone)?;
        copy_source_temp(&item.input_file, &item.input_temp)?;

        println!("Resampling {} {}", phone.position, phone.phoneme);
        log::debug!("{:?}", item);

        let file = item.resampler.run(&item)?;
        if !file.exists() {
            return Err(VoxportError::MissingOutput {
                resampler: item.resampler.name().to_string(),
                phoneme: phone.phoneme.clone(),
                path: file,
            });
        }
        copy_back_meta_files(&item.input_file, &item.input_temp)?;

        results.push(NoteResult {
            lead_in: phone.lead_in,
            position: phone.position,
            phoneme: phone.phoneme.clone(),
            file,
        });
    }
    log::info!("Resampled {} phones", results.len());
    Ok(results)
}
