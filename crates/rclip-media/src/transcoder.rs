//! Playlist-to-container transcoding.

use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Output arguments used when none are configured: remux without re-encoding.
pub const DEFAULT_OUTPUT_ARGS: &[&str] = &["-c", "copy"];

/// External transcoder contract.
///
/// Reads a playlist whose segments sit next to it and writes one
/// consolidated container file. Success means the output file exists.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, manifest: &Path, output: &Path) -> MediaResult<()>;
}

/// FFmpeg-backed transcoder.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    runner: FfmpegRunner,
    output_args: Vec<String>,
}

impl FfmpegTranscoder {
    pub fn new(runner: FfmpegRunner) -> Self {
        Self {
            runner,
            output_args: DEFAULT_OUTPUT_ARGS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the output arguments (codec and container options).
    pub fn with_output_args(mut self, args: Vec<String>) -> Self {
        self.output_args = args;
        self
    }

    pub fn output_args(&self) -> &[String] {
        &self.output_args
    }

    fn command(&self, manifest: &Path, output: &Path) -> FfmpegCommand {
        FfmpegCommand::new(manifest, output).output_args(self.output_args.iter().cloned())
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, manifest: &Path, output: &Path) -> MediaResult<()> {
        if !tokio::fs::try_exists(manifest).await? {
            return Err(MediaError::FileNotFound(manifest.to_path_buf()));
        }

        info!("Transcoding {} -> {}", manifest.display(), output.display());
        self.runner.run(&self.command(manifest, output)).await?;

        if !tokio::fs::try_exists(output).await? {
            return Err(MediaError::ffmpeg_failed(
                format!("FFmpeg reported success but wrote no {}", output.display()),
                None,
                Some(0),
            ));
        }

        Ok(())
    }
}
