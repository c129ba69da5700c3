//! Export Tests
//!
//! End-to-end tests for project export with an in-process resampler.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use voxport::cli::commands::export_project;
use voxport::environment::{Config, Environment, Preferences};
use voxport::resampler::{Resampler, ResamplerItem, ResamplerSet};
use voxport::singer::SingerManager;
use voxport::{ErrorKind, Result, VoxportError};

/// Writes a short sine at the item's tone, so output depends on the request.
struct SineResampler {
    calls: AtomicUsize,
}

impl Resampler for SineResampler {
    fn name(&self) -> &str {
        "sine"
    }

    fn run(&self, item: &ResamplerItem) -> Result<PathBuf> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(item.input_temp.exists(), "input must be staged first");
        let freq = 440.0 * 2f64.powf((item.tone - 69) as f64 / 12.0);
        write_sine(&item.output_file, freq, 2205);
        Ok(item.output_file.clone())
    }
}

/// Claims success without writing anything.
struct LazyResampler;

impl Resampler for LazyResampler {
    fn name(&self) -> &str {
        "lazy"
    }

    fn run(&self, item: &ResamplerItem) -> Result<PathBuf> {
        Ok(item.output_file.clone())
    }
}

fn write_sine(path: &Path, freq: f64, samples: usize) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..samples {
        let t = i as f64 / 44100.0;
        let v = (2.0 * std::f64::consts::PI * freq * t).sin() * 0.5;
        writer.write_sample((v * i16::MAX as f64) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Data dir with one voicebank, plus a project folder.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let vb = dir.path().join("data").join("Singers").join("teto");
        fs::create_dir_all(&vb).unwrap();
        fs::write(vb.join("character.txt"), "name=Teto\n").unwrap();
        fs::write(
            vb.join("oto.ini"),
            "_a.wav=a,0,50,-100,62.5,10\n_i.wav=i,0,40,-100,31.25,10\n",
        )
        .unwrap();
        write_sine(&vb.join("_a.wav"), 261.6, 4410);
        write_sine(&vb.join("_i.wav"), 261.6, 4410);
        fs::create_dir_all(dir.path().join("songs")).unwrap();
        Self { dir }
    }

    fn config(&self) -> Config {
        Config::with_data_dir(self.dir.path().join("data"))
    }

    fn env(&self, default: &str, resampler: Arc<dyn Resampler>) -> Environment {
        let config = self.config();
        fs::create_dir_all(&config.cache_dir).unwrap();
        let singers = SingerManager::load(&config.singers_dir).unwrap();
        let mut set = ResamplerSet::new();
        set.register(resampler);
        Environment::new(
            config,
            Preferences {
                resampler: default.to_string(),
            },
            Box::new(set),
            singers,
        )
    }

    fn project(&self, json: &str) -> PathBuf {
        let path = self.dir.path().join("songs").join("demo.ustx");
        fs::write(&path, json).unwrap();
        path
    }

    fn export_dir(&self) -> PathBuf {
        self.dir.path().join("songs").join("Export")
    }

    fn exported(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.export_dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }
}

const DEMO: &str = r#"{
    "name": "demo",
    "bpm": 120,
    "resolution": 480,
    "tracks": [{"singer": "Teto"}],
    "parts": [
        {"kind": "voice", "track_no": 0, "position": 0, "notes": [
            {"position": 0, "duration": 480, "tone": 60, "lyric": "a"},
            {"position": 480, "duration": 480, "tone": 64, "lyric": "i"},
            {"position": 1920, "duration": 480, "tone": 67, "lyric": "a"}
        ]},
        {"kind": "wave", "track_no": 0, "file": "backing.wav"}
    ]
}"#;

#[test]
fn test_export_writes_one_file_per_phone() {
    let fixture = Fixture::new();
    let path = fixture.project(DEMO);
    let resampler = Arc::new(SineResampler {
        calls: AtomicUsize::new(0),
    });
    let env = fixture.env("sine", resampler.clone());

    let summary = export_project(&env, &path).unwrap();
    assert_eq!(summary.written, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(resampler.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        fixture.exported(),
        vec![
            "000000_000060_a.wav",
            "000480_000030_i.wav",
            "001920_000060_a.wav",
        ]
    );

    let reader = hound::WavReader::open(fixture.export_dir().join("000480_000030_i.wav")).unwrap();
    assert_eq!(reader.len(), 2205);
}

#[test]
fn test_export_twice_is_identical() {
    let fixture = Fixture::new();
    let path = fixture.project(DEMO);
    let env = fixture.env(
        "sine",
        Arc::new(SineResampler {
            calls: AtomicUsize::new(0),
        }),
    );

    export_project(&env, &path).unwrap();
    let first = fs::read(fixture.export_dir().join("001920_000060_a.wav")).unwrap();
    export_project(&env, &path).unwrap();
    let second = fs::read(fixture.export_dir().join("001920_000060_a.wav")).unwrap();

    assert_eq!(first, second);
    assert_eq!(fixture.exported().len(), 3);
}

#[test]
fn test_missing_output_aborts_before_export() {
    let fixture = Fixture::new();
    let path = fixture.project(DEMO);
    let env = fixture.env("lazy", Arc::new(LazyResampler));

    let err = export_project(&env, &path).unwrap_err();
    match &err {
        VoxportError::MissingOutput {
            resampler, phoneme, ..
        } => {
            assert_eq!(resampler, "lazy");
            assert_eq!(phoneme, "a");
        }
        other => panic!("expected MissingOutput, got {}", other),
    }
    assert_eq!(err.kind(), ErrorKind::Data);
    assert!(!fixture.export_dir().exists());
}

#[test]
fn test_missing_singer_stops_before_rendering() {
    let fixture = Fixture::new();
    let path = fixture.project(&DEMO.replace("\"Teto\"", "\"Miku\""));
    let resampler = Arc::new(SineResampler {
        calls: AtomicUsize::new(0),
    });
    let env = fixture.env("sine", resampler.clone());

    let err = export_project(&env, &path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Environment);
    assert!(err.to_string().contains("Miku"));
    assert_eq!(resampler.calls.load(Ordering::SeqCst), 0);
    assert!(!fixture.export_dir().exists());
}

#[test]
fn test_missing_resampler_stops_before_rendering() {
    let fixture = Fixture::new();
    let path = fixture.project(DEMO);
    let resampler = Arc::new(SineResampler {
        calls: AtomicUsize::new(0),
    });
    let env = fixture.env("moresampler.exe", resampler.clone());

    let err = export_project(&env, &path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Environment);
    assert!(err.to_string().contains("moresampler.exe"));
    assert_eq!(resampler.calls.load(Ordering::SeqCst), 0);
    assert!(!fixture.export_dir().exists());
}

#[test]
fn test_unknown_note_override_fails_when_rendered() {
    let fixture = Fixture::new();
    let path = fixture.project(&DEMO.replace(
        r#""lyric": "i"}"#,
        r#""lyric": "i", "resampler": "other"}"#,
    ));
    let env = fixture.env(
        "sine",
        Arc::new(SineResampler {
            calls: AtomicUsize::new(0),
        }),
    );

    let err = export_project(&env, &path).unwrap_err();
    assert!(matches!(err, VoxportError::ResamplerNotFound { ref resampler } if resampler == "other"));
}

#[test]
fn test_empty_project_exports_nothing() {
    let fixture = Fixture::new();
    let path = fixture.project(r#"{"tracks": [{"singer": "Teto"}], "parts": []}"#);
    let env = fixture.env(
        "sine",
        Arc::new(SineResampler {
            calls: AtomicUsize::new(0),
        }),
    );

    let summary = export_project(&env, &path).unwrap();
    assert_eq!(summary.written, 0);
    assert!(fixture.exported().is_empty());
}

#[cfg(unix)]
#[test]
fn test_export_with_script_resampler() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = Fixture::new();
    let config = fixture.config();
    fs::create_dir_all(&config.resamplers_dir).unwrap();
    let script = config.resamplers_dir.join("copy.sh");
    fs::write(&script, "#!/bin/sh\ncp \"$1\" \"$2\"\ntouch \"${1%.wav}_wav.frq\"\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let env = Environment::init(config).unwrap();
    assert_eq!(env.default_resampler(), "copy.sh");
    let path = fixture.project(DEMO);

    let summary = export_project(&env, &path).unwrap();
    assert_eq!(summary.written, 3);

    let vb = fixture.dir.path().join("data").join("Singers").join("teto");
    assert_eq!(
        fs::read(fixture.export_dir().join("000000_000060_a.wav")).unwrap(),
        fs::read(vb.join("_a.wav")).unwrap()
    );
    // analysis file written beside the staged input is copied back
    assert!(vb.join("_a_wav.frq").exists());
}
