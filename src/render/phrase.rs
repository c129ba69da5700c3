//! Phrase construction
//!
//! A voice part is split into phrases at every gap between notes. Each
//! sung note becomes one phone whose lead-in is the oto pre-utterance.

use std::sync::Arc;

use crate::project::{ms_to_ticks, Note, Project, Track, VoicePart};
use crate::singer::{Oto, Singer, SingerManager};

/// One phoneme occurrence to render.
#[derive(Debug, Clone)]
pub struct Phone {
    /// Absolute position in ticks.
    pub position: i32,
    pub duration: i32,
    /// Pre-utterance in ticks, never negative; the sample starts this far
    /// before `position`.
    pub lead_in: i32,
    pub phoneme: String,
    /// MIDI note number.
    pub tone: i32,
    pub oto: Oto,
    /// Per-note resampler override.
    pub resampler: Option<String>,
}

/// A run of phones without gaps, from one voice part.
#[derive(Debug, Clone)]
pub struct Phrase {
    pub track_no: usize,
    /// Index of the source part in `Project::parts`.
    pub part_index: usize,
    pub singer: Arc<Singer>,
    pub bpm: f64,
    /// Ticks per quarter note.
    pub resolution: i32,
    pub phones: Vec<Phone>,
}

/// Split one voice part into phrases.
pub fn build_phrases(
    project: &Project,
    track: &Track,
    part_index: usize,
    part: &VoicePart,
    singer: &Arc<Singer>,
) -> Vec<Phrase> {
    let mut notes: Vec<&Note> = part.notes.iter().filter(|n| !n.is_rest()).collect();
    notes.sort_by_key(|n| n.position);

    let mut phrases = Vec::new();
    let mut phones: Vec<Phone> = Vec::new();
    let mut last_end: Option<i32> = None;

    for note in notes {
        if last_end.is_some_and(|end| note.position > end) && !phones.is_empty() {
            phrases.push(phrase(project, track, part_index, singer, std::mem::take(&mut phones)));
        }
        last_end = Some(last_end.map_or(note.end(), |end| end.max(note.end())));

        let lyric = note.lyric.trim();
        let Some(oto) = singer.oto(lyric) else {
            log::warn!(
                "{} has no alias for {:?} at tick {}, skipping",
                singer.name,
                lyric,
                part.position + note.position
            );
            continue;
        };
        phones.push(Phone {
            position: part.position + note.position,
            duration: note.duration,
            lead_in: ms_to_ticks(oto.preutter.max(0.0), project.bpm, project.resolution),
            phoneme: oto.alias.clone(),
            tone: note.tone,
            oto: oto.clone(),
            resampler: note.resampler.clone(),
        });
    }
    if !phones.is_empty() {
        phrases.push(phrase(project, track, part_index, singer, phones));
    }
    phrases
}

fn phrase(
    project: &Project,
    track: &Track,
    part_index: usize,
    singer: &Arc<Singer>,
    phones: Vec<Phone>,
) -> Phrase {
    Phrase {
        track_no: track.track_no,
        part_index,
        singer: singer.clone(),
        bpm: project.bpm,
        resolution: project.resolution,
        phones,
    }
}

/// Phrases of every voice part, in track order then part order.
pub fn enumerate_phrases(project: &Project, singers: &SingerManager) -> Vec<Phrase> {
    let mut phrases = Vec::new();
    for track in &project.tracks {
        let singer = singers.resolve(&track.singer);
        for (part_index, part) in project.parts.iter().enumerate() {
            if part.track_no() != track.track_no {
                continue;
            }
            if let Some(voice) = part.as_voice() {
                phrases.extend(build_phrases(project, track, part_index, voice, &singer));
            }
        }
    }
    phrases
}

/// Every (phrase, phone) pair in render order.
pub fn phone_pairs(phrases: &[Phrase]) -> impl Iterator<Item = (&Phrase, &Phone)> {
    phrases
        .iter()
        .flat_map(|phrase| phrase.phones.iter().map(move |phone| (phrase, phone)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::singer::parse_oto;
    use std::path::Path;

    fn project(json: &str) -> Project {
        let mut project: Project = serde_json::from_str(json).unwrap();
        for (i, track) in project.tracks.iter_mut().enumerate() {
            track.track_no = i;
        }
        project
    }

    fn singers() -> SingerManager {
        let otos = parse_oto("_a.wav=a,0,50,-100,62.5,10\n_i.wav=i,0,50,-100,0,0\n", Path::new("/vb"));
        SingerManager::from_singers(vec![Singer::new("teto", "Teto", Path::new("/vb"), otos)])
    }

    #[test]
    fn test_gap_splits_phrases() {
        let project = project(
            r#"{"bpm": 120, "tracks": [{"singer": "Teto"}], "parts": [
                {"kind": "voice", "track_no": 0, "position": 960, "notes": [
                    {"position": 480, "duration": 240, "tone": 62, "lyric": "i"},
                    {"position": 0, "duration": 480, "tone": 60, "lyric": "a"},
                    {"position": 720, "duration": 240, "tone": 60, "lyric": "R"},
                    {"position": 1440, "duration": 480, "tone": 60, "lyric": "a"}
                ]}
            ]}"#,
        );
        let phrases = enumerate_phrases(&project, &singers());
        assert_eq!(phrases.len(), 2);
        assert_eq!(phrases[0].phones.len(), 2);
        assert_eq!(phrases[0].phones[0].position, 960);
        assert_eq!(phrases[0].phones[0].lead_in, 60);
        assert_eq!(phrases[0].phones[1].phoneme, "i");
        assert_eq!(phrases[0].phones[1].lead_in, 0);
        assert_eq!(phrases[1].phones[0].position, 2400);
    }

    #[test]
    fn test_order_follows_tracks_then_parts() {
        let project = project(
            r#"{"bpm": 120, "tracks": [{"singer": "Teto"}, {"singer": "teto"}], "parts": [
                {"kind": "voice", "track_no": 1, "notes": [
                    {"position": 0, "duration": 480, "tone": 60, "lyric": "i"}
                ]},
                {"kind": "wave", "track_no": 0, "file": "x.wav"},
                {"kind": "voice", "track_no": 0, "notes": [
                    {"position": 0, "duration": 480, "tone": 60, "lyric": "a"}
                ]}
            ]}"#,
        );
        let phrases = enumerate_phrases(&project, &singers());
        let order: Vec<_> = phone_pairs(&phrases)
            .map(|(phrase, phone)| (phrase.track_no, phrase.part_index, phone.phoneme.as_str()))
            .collect();
        assert_eq!(order, vec![(0, 2, "a"), (1, 0, "i")]);
    }

    #[test]
    fn test_unknown_alias_is_skipped() {
        let project = project(
            r#"{"tracks": [{"singer": "Teto"}], "parts": [
                {"kind": "voice", "track_no": 0, "notes": [
                    {"position": 0, "duration": 480, "tone": 60, "lyric": "xyz"},
                    {"position": 480, "duration": 480, "tone": 60, "lyric": "a"}
                ]}
            ]}"#,
        );
        let phrases = enumerate_phrases(&project, &singers());
        assert_eq!(phrases.len(), 1);
        assert_eq!(phrases[0].phones.len(), 1);
        assert_eq!(phrases[0].phones[0].position, 480);
    }

    #[test]
    fn test_negative_preutterance_gives_zero_lead_in() {
        let otos = parse_oto("_u.wav=u,0,50,-100,-20,0\n", Path::new("/vb"));
        let singers =
            SingerManager::from_singers(vec![Singer::new("teto", "Teto", Path::new("/vb"), otos)]);
        let project = project(
            r#"{"tracks": [{"singer": "Teto"}], "parts": [
                {"kind": "voice", "track_no": 0, "notes": [
                    {"position": 0, "duration": 480, "tone": 60, "lyric": "u"}
                ]}
            ]}"#,
        );
        let phrases = enumerate_phrases(&project, &singers);
        assert_eq!(phrases[0].phones[0].lead_in, 0);
    }
}
