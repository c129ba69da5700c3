//! Project model and loading.
//!
//! `.ustx` documents are stored as JSON: tracks reference singers by name,
//! parts reference tracks by index and are tagged by `kind`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxportError};

/// Extension of project files.
pub const PROJECT_EXTENSION: &str = "ustx";

/// Ticks per quarter note when a project doesn't say.
pub const DEFAULT_RESOLUTION: i32 = 480;

/// Tempo when a project doesn't say.
pub const DEFAULT_BPM: f64 = 120.0;

/// Lyrics treated as rests.
const REST_LYRICS: &[&str] = &["", "R", "r"];

/// A loaded singing-synthesis project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,

    #[serde(default = "default_bpm")]
    pub bpm: f64,

    /// Ticks per quarter note.
    #[serde(default = "default_resolution")]
    pub resolution: i32,

    #[serde(default)]
    pub tracks: Vec<Track>,

    #[serde(default)]
    pub parts: Vec<Part>,

    /// Path the project was loaded from (not serialized).
    #[serde(skip)]
    pub file_path: PathBuf,
}

fn default_bpm() -> f64 {
    DEFAULT_BPM
}

fn default_resolution() -> i32 {
    DEFAULT_RESOLUTION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Singer name or voicebank id.
    #[serde(default)]
    pub singer: String,

    /// Position in `Project::tracks`, assigned on load.
    #[serde(skip)]
    pub track_no: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    Voice(VoicePart),
    Wave(WavePart),
}

impl Part {
    pub fn track_no(&self) -> usize {
        match self {
            Part::Voice(p) => p.track_no,
            Part::Wave(p) => p.track_no,
        }
    }

    pub fn as_voice(&self) -> Option<&VoicePart> {
        match self {
            Part::Voice(p) => Some(p),
            Part::Wave(_) => None,
        }
    }
}

/// A part holding notes; the only kind that renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoicePart {
    pub track_no: usize,

    /// Start of the part in ticks.
    #[serde(default)]
    pub position: i32,

    #[serde(default)]
    pub notes: Vec<Note>,
}

/// An imported audio clip; ignored by rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WavePart {
    pub track_no: usize,

    #[serde(default)]
    pub position: i32,

    #[serde(default)]
    pub file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Ticks from the start of the part.
    pub position: i32,

    pub duration: i32,

    /// MIDI note number.
    pub tone: i32,

    pub lyric: String,

    /// Resampler to use for this note instead of the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resampler: Option<String>,
}

impl Note {
    /// Saturates; loaded projects are checked to fit in `i32`.
    pub fn end(&self) -> i32 {
        self.position.saturating_add(self.duration)
    }

    pub fn is_rest(&self) -> bool {
        REST_LYRICS.contains(&self.lyric.trim())
    }
}

/// Milliseconds spanned by `ticks` at `bpm` with `resolution` ticks per
/// quarter note.
pub fn ticks_to_ms(ticks: i32, bpm: f64, resolution: i32) -> f64 {
    ticks as f64 * 60_000.0 / (bpm * resolution as f64)
}

/// Ticks spanned by `ms`, rounded to the nearest.
pub fn ms_to_ticks(ms: f64, bpm: f64, resolution: i32) -> i32 {
    (ms * bpm * resolution as f64 / 60_000.0).round() as i32
}

impl Project {

    /// Voice parts of one track, in stored order.
    pub fn voice_parts(&self, track: &Track) -> impl Iterator<Item = &VoicePart> {
        let track_no = track.track_no;
        self.parts
            .iter()
            .filter(move |p| p.track_no() == track_no)
            .filter_map(Part::as_voice)
    }

    fn after_load(&mut self, path: &Path) -> Result<()> {
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(VoxportError::InvalidProject {
                reason: format!("bpm must be positive, got {}", self.bpm),
            });
        }
        if self.resolution <= 0 {
            return Err(VoxportError::InvalidProject {
                reason: format!("resolution must be positive, got {}", self.resolution),
            });
        }
        for (i, part) in self.parts.iter().enumerate() {
            check_part_ticks(i, part)?;
        }
        for (i, track) in self.tracks.iter_mut().enumerate() {
            track.track_no = i;
        }
        self.file_path = path.to_path_buf();
        Ok(())
    }
}

/// Tick values must be non-negative and every note must end within `i32`
/// once offset by its part.
fn check_part_ticks(index: usize, part: &Part) -> Result<()> {
    let invalid = |reason: String| VoxportError::InvalidProject {
        reason: format!("part {}: {}", index, reason),
    };
    let (position, notes) = match part {
        Part::Voice(p) => (p.position, p.notes.as_slice()),
        Part::Wave(p) => (p.position, &[][..]),
    };
    if position < 0 {
        return Err(invalid(format!("negative position {}", position)));
    }
    for (n, note) in notes.iter().enumerate() {
        if note.position < 0 || note.duration < 0 {
            return Err(invalid(format!(
                "note {} has negative position or duration ({}, {})",
                n, note.position, note.duration
            )));
        }
        note.position
            .checked_add(note.duration)
            .and_then(|end| end.checked_add(position))
            .ok_or_else(|| invalid(format!("note {} ends past the last tick", n)))?;
    }
    Ok(())
}

/// Load a project, choosing the deserializer by file extension.
pub fn load_project(path: &Path) -> Result<Project> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    if ext != PROJECT_EXTENSION {
        return Err(VoxportError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| VoxportError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut project: Project = serde_json::from_str(&content)?;
    project.after_load(path)?;

    log::info!(
        "Loaded project {:?}: {} tracks, {} parts",
        project.name,
        project.tracks.len(),
        project.parts.len()
    );
    Ok(project)
}
