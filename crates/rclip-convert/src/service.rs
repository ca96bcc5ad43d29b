//! Managed transcoding service abstraction.

use async_trait::async_trait;
use rclip_models::{JobId, TranscodeJobSpec};

use crate::error::ConvertResult;

/// Outcome of a job submission as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobReply {
    /// HTTP status of the submission
    pub status_code: u16,
    /// Job identifier, when the service assigned one
    pub job_id: Option<JobId>,
    /// Service error code and message for rejected submissions
    pub message: Option<String>,
}

impl CreateJobReply {
    pub fn accepted(status_code: u16, job_id: Option<JobId>) -> Self {
        Self {
            status_code,
            job_id,
            message: None,
        }
    }

    pub fn rejected(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            job_id: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Submission endpoint of a managed transcoding service.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submit `spec` to run under the execution `role`.
    ///
    /// Does not wait for the job; completion is reported by the service.
    async fn create_job(
        &self,
        role: &str,
        spec: &TranscodeJobSpec,
    ) -> ConvertResult<CreateJobReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_success_range() {
        assert!(CreateJobReply::accepted(201, Some(JobId::from_string("j-1"))).is_success());
        assert!(CreateJobReply::accepted(200, None).is_success());
        assert!(!CreateJobReply::rejected(400, "BadRequestException").is_success());
        assert!(!CreateJobReply::rejected(503, "unavailable").is_success());
    }
}
