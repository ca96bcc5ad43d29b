//! FFmpeg CLI wrapper for stitching harvested playlists.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Progress parsing from `-progress pipe:2`
//! - Exit status checking with captured diagnostics
//! - The `Transcoder` seam used by the local stitch worker

pub mod command;
pub mod error;
pub mod progress;
pub mod transcoder;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use error::{MediaError, MediaResult};
pub use progress::FfmpegProgress;
pub use transcoder::{FfmpegTranscoder, Transcoder, DEFAULT_OUTPUT_ARGS};
