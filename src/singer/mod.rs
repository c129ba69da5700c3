//! Singer (voicebank) discovery and resolution.
//!
//! A voicebank is a directory under `Singers/` holding an optional
//! `character.txt` and any number of `oto.ini` files in subdirectories.

pub mod files;
pub mod oto;
pub mod text;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::error::{Result, VoxportError};

pub use files::{copy_back_meta_files, copy_source_temp, source_temp_path};
pub use oto::{parse_oto, Oto};

const CHARACTER_FILE: &str = "character.txt";
const OTO_FILE: &str = "oto.ini";

/// A resolved or placeholder singer.
#[derive(Debug, Clone)]
pub struct Singer {
    /// Stable identifier, the voicebank directory name.
    pub id: String,
    /// Display name from `character.txt`, else the id.
    pub name: String,
    pub location: PathBuf,
    /// False for placeholders standing in for voicebanks that aren't installed.
    pub found: bool,
    otos: HashMap<String, Oto>,
}

impl Singer {
    /// Build a singer from already parsed entries.
    pub fn new(id: &str, name: &str, location: &Path, otos: Vec<Oto>) -> Self {
        let mut map = HashMap::new();
        for oto in otos {
            // first entry wins, matching how UTAU resolves duplicate aliases
            map.entry(oto.alias.clone()).or_insert(oto);
        }
        Self {
            id: id.to_string(),
            name: name.to_string(),
            location: location.to_path_buf(),
            found: true,
            otos: map,
        }
    }

    /// Placeholder for a singer referenced by a project but not installed.
    pub fn missing(name: &str) -> Self {
        Self {
            id: name.to_string(),
            name: name.to_string(),
            location: PathBuf::new(),
            found: false,
            otos: HashMap::new(),
        }
    }

    /// Load a voicebank directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let id = dir
            .file_name()
            .ok_or_else(|| VoxportError::InvalidProject {
                reason: format!("voicebank path has no name: {}", dir.display()),
            })?
            .to_string_lossy()
            .to_string();

        let character = dir.join(CHARACTER_FILE);
        let name = if character.exists() {
            character_name(&text::read_legacy_text(&character)?).unwrap_or_else(|| id.clone())
        } else {
            id.clone()
        };

        let mut otos = Vec::new();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.file_type().is_file() && entry.file_name() == OTO_FILE {
                let content = text::read_legacy_text(entry.path())?;
                let oto_dir = entry.path().parent().unwrap_or(dir);
                otos.extend(parse_oto(&content, oto_dir));
            }
        }

        Ok(Self::new(&id, &name, dir, otos))
    }

    /// Look up an alias.
    pub fn oto(&self, alias: &str) -> Option<&Oto> {
        self.otos.get(alias)
    }

    pub fn alias_count(&self) -> usize {
        self.otos.len()
    }
}

fn character_name(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        (key.trim().eq_ignore_ascii_case("name") && !value.trim().is_empty())
            .then(|| value.trim().to_string())
    })
}

/// Installed singers, keyed by both id and display name.
#[derive(Debug, Default)]
pub struct SingerManager {
    singers: Vec<Arc<Singer>>,
    by_key: HashMap<String, Arc<Singer>>,
}

impl SingerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from singers constructed elsewhere.
    pub fn from_singers(singers: Vec<Singer>) -> Self {
        let mut manager = Self::new();
        for singer in singers {
            manager.register(singer);
        }
        manager
    }

    /// Load every voicebank directory under `dir`; a missing directory is
    /// created and yields no singers.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| VoxportError::DirectoryCreateError {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let mut manager = Self::new();
        let mut entries: Vec<_> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        entries.sort();

        for path in entries {
            match Singer::load(&path) {
                Ok(singer) => {
                    log::info!(
                        "Loaded singer {} ({} aliases) from {}",
                        singer.name,
                        singer.alias_count(),
                        path.display()
                    );
                    manager.register(singer);
                }
                Err(e) => log::warn!("Skipping voicebank {}: {}", path.display(), e),
            }
        }
        Ok(manager)
    }

    pub fn register(&mut self, singer: Singer) {
        let singer = Arc::new(singer);
        self.by_key.insert(singer.id.clone(), singer.clone());
        self.by_key.insert(singer.name.clone(), singer.clone());
        self.singers.push(singer);
    }

    /// Resolve a singer reference; unknown names give a placeholder with
    /// `found == false`.
    pub fn resolve(&self, name: &str) -> Arc<Singer> {
        self.by_key
            .get(name)
            .cloned()
            .unwrap_or_else(|| Arc::new(Singer::missing(name)))
    }

    pub fn len(&self) -> usize {
        self.singers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.singers.is_empty()
    }
}
