//! Pre-render environment check.

use crate::environment::Environment;
use crate::error::{Result, VoxportError};
use crate::project::Project;

/// Fail if a track's singer isn't installed or the default resampler is
/// missing.
// TODO: per-note resampler overrides are only caught when their phone is
// rendered; check them here too.
pub fn check_environment(env: &Environment, project: &Project) -> Result<()> {
    for track in &project.tracks {
        let singer = env.singers.resolve(&track.singer);
        if !singer.found {
            return Err(VoxportError::SingerNotFound {
                singer: track.singer.clone(),
            });
        }
    }

    let resampler = env.default_resampler();
    if env.resamplers.find(resampler).is_none() {
        return Err(VoxportError::ResamplerNotFound {
            resampler: resampler.to_string(),
        });
    }
    Ok(())
}
