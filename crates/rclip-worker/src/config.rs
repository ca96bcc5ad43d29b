//! Worker configuration.
//!
//! Both binaries read their configuration once at startup; a missing
//! required variable stops the process before it serves any event.

use std::path::PathBuf;

use rclip_media::DEFAULT_OUTPUT_ARGS;

use crate::error::{WorkerError, WorkerResult};

const DESTINATION_BUCKET_VAR: &str = "S3_DESTINATION_BUCKET";
const ROLE_VAR: &str = "IAM_ROLE";

/// Content type of uploaded artifacts when none is configured.
pub const DEFAULT_CONTENT_TYPE: &str = "video/mp4";

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> WorkerResult<String> {
    optional(lookup, name).ok_or_else(|| WorkerError::config_error(format!("{} is not set", name)))
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Local stitch worker configuration.
#[derive(Debug, Clone)]
pub struct StitchConfig {
    /// Bucket receiving the stitched artifact
    pub destination_bucket: String,
    /// Root for staging areas (system temp dir when unset)
    pub work_dir: Option<PathBuf>,
    /// FFmpeg executable (resolved from `PATH` when unset)
    pub ffmpeg_path: Option<PathBuf>,
    /// FFmpeg output arguments
    pub output_args: Vec<String>,
    /// Content type of the uploaded artifact
    pub content_type: String,
}

impl StitchConfig {
    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WorkerResult<Self> {
        Ok(Self {
            destination_bucket: required(&lookup, DESTINATION_BUCKET_VAR)?,
            work_dir: optional(&lookup, "WORKER_WORK_DIR").map(PathBuf::from),
            ffmpeg_path: optional(&lookup, "FFMPEG_PATH").map(PathBuf::from),
            output_args: optional(&lookup, "TRANSCODER_OUTPUT_ARGS")
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or_else(|| DEFAULT_OUTPUT_ARGS.iter().map(|s| s.to_string()).collect()),
            content_type: optional(&lookup, "OUTPUT_CONTENT_TYPE")
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
        })
    }
}

/// Managed job submitter configuration.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Bucket the managed service writes into
    pub destination_bucket: String,
    /// Execution role the job runs under
    pub role_arn: String,
}

impl SubmitConfig {
    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WorkerResult<Self> {
        Ok(Self {
            destination_bucket: required(&lookup, DESTINATION_BUCKET_VAR)?,
            role_arn: required(&lookup, ROLE_VAR)?,
        })
    }
}
