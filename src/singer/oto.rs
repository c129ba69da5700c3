//! `oto.ini` parsing.
//!
//! Each line maps a sample file to an alias plus timing, all in milliseconds:
//! `file.wav=alias,offset,consonant,cutoff,preutter,overlap`.

use std::path::{Path, PathBuf};

/// One alias entry of a voicebank.
#[derive(Debug, Clone, PartialEq)]
pub struct Oto {
    pub alias: String,
    /// Absolute path of the source sample.
    pub file: PathBuf,
    pub offset: f64,
    pub consonant: f64,
    /// Negative values are measured from the offset, positive from the end.
    pub cutoff: f64,
    pub preutter: f64,
    pub overlap: f64,
}

/// Parse the contents of an `oto.ini` whose samples live in `dir`.
///
/// Malformed lines are skipped with a warning. An empty alias takes the
/// sample's file stem.
pub fn parse_oto(content: &str, dir: &Path) -> Vec<Oto> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(lineno, line)| {
            let oto = parse_line(line.trim(), dir);
            if oto.is_none() {
                log::warn!("{}: skipping malformed oto line {}", dir.display(), lineno + 1);
            }
            oto
        })
        .collect()
}

fn parse_line(line: &str, dir: &Path) -> Option<Oto> {
    let (file, rest) = line.split_once('=')?;
    let mut fields = rest.split(',');
    let alias = fields.next()?.trim();
    let mut numbers = [0.0f64; 5];
    for slot in numbers.iter_mut() {
        let field = fields.next().unwrap_or("").trim();
        *slot = if field.is_empty() { 0.0 } else { field.parse().ok()? };
    }
    let file = file.trim();
    let alias = if alias.is_empty() {
        Path::new(file).file_stem()?.to_string_lossy().to_string()
    } else {
        alias.to_string()
    };
    Some(Oto {
        alias,
        file: dir.join(file),
        offset: numbers[0],
        consonant: numbers[1],
        cutoff: numbers[2],
        preutter: numbers[3],
        overlap: numbers[4],
    })
}
