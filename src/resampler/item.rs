//! Render requests.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::Resampler;
use crate::environment::Environment;
use crate::error::{Result, VoxportError};
use crate::project::ticks_to_ms;
use crate::render::{Phone, Phrase};
use crate::singer::files::source_temp_path;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const DEFAULT_VELOCITY: f64 = 100.0;
const DEFAULT_VOLUME: f64 = 100.0;

/// Requested lengths are rounded up to this many milliseconds.
const LENGTH_STEP_MS: f64 = 50.0;

/// Scientific pitch name of a MIDI note, `60` is `C4`.
pub fn tone_name(tone: i32) -> String {
    let name = NOTE_NAMES[tone.rem_euclid(12) as usize];
    format!("{}{}", name, tone.div_euclid(12) - 1)
}

/// Everything a resampler needs to render one phone.
pub struct ResamplerItem {
    pub resampler: Arc<dyn Resampler>,
    pub phoneme: String,
    /// Voicebank sample.
    pub input_file: PathBuf,
    /// Staged copy of `input_file` the resampler reads.
    pub input_temp: PathBuf,
    /// Where the resampler writes its result.
    pub output_file: PathBuf,
    pub tone: i32,
    pub velocity: f64,
    pub volume: f64,
    pub modulation: f64,
    pub flags: String,
    /// Milliseconds, from the oto entry.
    pub offset: f64,
    pub consonant: f64,
    pub cutoff: f64,
    /// Milliseconds of audio to produce.
    pub required_length: f64,
    pub tempo: f64,
}

impl ResamplerItem {
    /// Resolve the resampler and file paths for one phone.
    ///
    /// The note's own resampler wins over the default one.
    pub fn new(env: &Environment, phrase: &Phrase, phone: &Phone) -> Result<Self> {
        let name = phone
            .resampler
            .as_deref()
            .unwrap_or_else(|| env.default_resampler());
        let resampler = env
            .resamplers
            .find(name)
            .ok_or_else(|| VoxportError::ResamplerNotFound {
                resampler: name.to_string(),
            })?;

        let required =
            ticks_to_ms(phone.duration, phrase.bpm, phrase.resolution) + phone.oto.preutter;
        let required_length = (required / LENGTH_STEP_MS).ceil() * LENGTH_STEP_MS;

        let input_file = phone.oto.file.clone();
        let input_temp =
            source_temp_path(&env.config.cache_dir, &phrase.singer.id, &input_file);

        let mut item = Self {
            resampler,
            phoneme: phone.phoneme.clone(),
            input_file,
            input_temp,
            output_file: PathBuf::new(),
            tone: phone.tone,
            velocity: DEFAULT_VELOCITY,
            volume: DEFAULT_VOLUME,
            modulation: 0.0,
            flags: String::new(),
            offset: phone.oto.offset,
            consonant: phone.oto.consonant,
            cutoff: phone.oto.cutoff,
            required_length,
            tempo: phrase.bpm,
        };
        item.output_file = env
            .config
            .cache_dir
            .join(format!("res-{}.wav", item.hash()));
        Ok(item)
    }

    /// Stable digest of the resampler and every render parameter; equal
    /// requests share one output file.
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.resampler.name().as_bytes());
        hasher.update([0]);
        hasher.update(self.input_file.to_string_lossy().as_bytes());
        hasher.update([0]);
        let params = format!(
            "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
            self.tone,
            self.velocity,
            self.volume,
            self.modulation,
            self.flags,
            self.offset,
            self.consonant,
            self.cutoff,
            self.required_length,
            self.tempo
        );
        hasher.update(params.as_bytes());
        let mut digest = format!("{:x}", hasher.finalize());
        digest.truncate(32);
        digest
    }

    #[cfg(test)]
    pub(crate) fn for_test(
        resampler: Arc<dyn Resampler>,
        input_temp: PathBuf,
        output_file: PathBuf,
        phoneme: &str,
        tone: i32,
    ) -> Self {
        Self {
            resampler,
            phoneme: phoneme.to_string(),
            input_file: input_temp.clone(),
            input_temp,
            output_file,
            tone,
            velocity: DEFAULT_VELOCITY,
            volume: DEFAULT_VOLUME,
            modulation: 0.0,
            flags: String::new(),
            offset: 0.0,
            consonant: 0.0,
            cutoff: 0.0,
            required_length: 500.0,
            tempo: 120.0,
        }
    }
}

impl fmt::Debug for ResamplerItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResamplerItem")
            .field("resampler", &self.resampler.name())
            .field("phoneme", &self.phoneme)
            .field("input_file", &self.input_file)
            .field("input_temp", &self.input_temp)
            .field("output_file", &self.output_file)
            .field("tone", &self.tone)
            .field("required_length", &self.required_length)
            .finish()
    }
}
