//! Voxport - phone-by-phone export of singing-voice projects
//!
//! Voxport loads a `.ustx` project, renders every sung phone through a
//! UTAU-style resampler and copies the results into an `Export` folder,
//! named by position, lead-in and phoneme.
//!
//! # Architecture
//!
//! One sequential pipeline:
//! - `environment`: cache, preferences, installed resamplers and singers
//! - `project`: the project model and loader
//! - `render`: phrase construction, resampling and export
//! - `cli`: argument handling and the top-level command

pub mod cli;
pub mod environment;
pub mod error;
pub mod project;
pub mod render;
pub mod resampler;
pub mod singer;

pub use error::{ErrorKind, Result, VoxportError};
