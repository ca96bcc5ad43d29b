//! Worker error types.

use rclip_media::MediaError;
use rclip_models::{DecodeError, JobId};
use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Malformed event: {0}")]
    MalformedEvent(#[from] DecodeError),

    #[error("No inputs found under s3://{bucket}/{prefix}")]
    NoInputsFound { bucket: String, prefix: String },

    #[error("Manifest {0} is not among the listed inputs")]
    ManifestNotListed(String),

    #[error("Invalid object key: {0}")]
    InvalidObjectKey(String),

    #[error("List failed: {0}")]
    ListFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Transcode failed: {message}")]
    TranscodeFailed {
        message: String,
        exit_code: Option<i32>,
    },

    #[error(
        "Submission rejected with status {status_code}: {}",
        .message.as_deref().unwrap_or("no message")
    )]
    SubmissionRejected {
        status_code: u16,
        job_id: Option<JobId>,
        message: Option<String>,
    },

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Staging error: {0}")]
    Staging(#[from] std::io::Error),
}

impl WorkerError {
    pub fn no_inputs_found(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::NoInputsFound {
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    pub fn list_failed(msg: impl Into<String>) -> Self {
        Self::ListFailed(msg.into())
    }

    pub fn download_failed(msg: impl Into<String>) -> Self {
        Self::DownloadFailed(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn submission_failed(msg: impl Into<String>) -> Self {
        Self::SubmissionFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Status code reported for this failure.
    ///
    /// Rejected submissions report the managed service's own status.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MalformedEvent(_) | Self::InvalidObjectKey(_) => 400,
            Self::NoInputsFound { .. } | Self::ManifestNotListed(_) => 404,
            Self::ListFailed(_)
            | Self::DownloadFailed(_)
            | Self::UploadFailed(_)
            | Self::SubmissionFailed(_) => 502,
            Self::SubmissionRejected { status_code, .. } => *status_code,
            Self::TranscodeFailed { .. } | Self::ConfigError(_) | Self::Staging(_) => 500,
        }
    }

    /// Check if error is retryable.
    ///
    /// Only storage and transport failures are; everything else fails the
    /// same way on a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WorkerError::ListFailed(_)
                | WorkerError::DownloadFailed(_)
                | WorkerError::UploadFailed(_)
                | WorkerError::SubmissionFailed(_)
        )
    }

    /// Job id attached to a rejected submission, if the service returned one.
    pub fn job_id(&self) -> Option<&JobId> {
        match self {
            Self::SubmissionRejected { job_id, .. } => job_id.as_ref(),
            _ => None,
        }
    }
}

impl From<MediaError> for WorkerError {
    fn from(err: MediaError) -> Self {
        let exit_code = err.exit_code();
        let message = match &err {
            MediaError::FfmpegFailed {
                stderr: Some(stderr),
                ..
            } => format!("{}\n{}", err, stderr),
            _ => err.to_string(),
        };
        Self::TranscodeFailed { message, exit_code }
    }
}

impl From<rclip_convert::ConvertError> for WorkerError {
    fn from(err: rclip_convert::ConvertError) -> Self {
        match err {
            rclip_convert::ConvertError::InvalidSpec(msg) => Self::config_error(msg),
            rclip_convert::ConvertError::Transport(msg) => Self::submission_failed(msg),
        }
    }
}
