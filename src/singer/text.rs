//! Legacy text decoding for voicebank metadata.
//!
//! Older voicebanks ship `oto.ini` and `character.txt` in Shift-JIS.

use std::fs;
use std::path::Path;

use encoding_rs::SHIFT_JIS;

use crate::error::{Result, VoxportError};

/// Decode bytes as UTF-8 (BOM stripped), falling back to Shift-JIS.
pub fn decode_legacy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
            if had_errors {
                log::warn!("Text is neither UTF-8 nor Shift-JIS; some characters were replaced");
            }
            text.into_owned()
        }
    }
}

/// Read a metadata file written in UTF-8 or Shift-JIS.
pub fn read_legacy_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| VoxportError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(decode_legacy(&bytes))
}
