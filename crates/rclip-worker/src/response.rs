//! Invocation response.

use rclip_models::JobId;
use serde::{Deserialize, Serialize};

use crate::error::WorkerError;

/// Status of a stitched artifact that was uploaded.
pub const STATUS_OK: u16 = 200;
/// Status of a part-set manifest whose sibling parts are still missing.
pub const STATUS_AWAITING_PARTS: u16 = 202;

/// Value returned to the invoking environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InvocationResponse {
    fn status(status_code: u16) -> Self {
        Self {
            status_code,
            job_id: None,
            output_key: None,
            error: None,
        }
    }

    /// Artifact uploaded under `output_key`.
    pub fn stitched(output_key: impl Into<String>) -> Self {
        Self {
            output_key: Some(output_key.into()),
            ..Self::status(STATUS_OK)
        }
    }

    /// Job accepted by the managed service.
    pub fn submitted(status_code: u16, job_id: JobId) -> Self {
        Self {
            job_id: Some(job_id),
            ..Self::status(status_code)
        }
    }

    /// Nothing submitted yet; more parts must arrive first.
    pub fn awaiting_parts() -> Self {
        Self::status(STATUS_AWAITING_PARTS)
    }

    /// Report a fatal failure.
    pub fn from_error(err: &WorkerError) -> Self {
        Self {
            job_id: err.job_id().cloned(),
            error: Some(err.to_string()),
            ..Self::status(err.status_code())
        }
    }
}
