//! Managed transcode job submission.

use std::sync::Arc;

use async_trait::async_trait;
use rclip_convert::JobService;
use rclip_models::{HarvestJobEvent, JobId, PartSet, TranscodeJobSpec};
use rclip_storage::ObjectStore;
use tracing::info;

use crate::config::SubmitConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::InvocationLogger;
use crate::pipeline::ArtifactProducer;
use crate::resolver::ResolvedInputs;
use crate::response::InvocationResponse;

/// Job accepted by the managed service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedJob {
    pub status_code: u16,
    pub job_id: JobId,
}

/// Result of handling one manifest on the managed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted(SubmittedJob),
    /// Part of a multi-part harvest whose other parts have not arrived.
    AwaitingParts { present: usize, total: u32 },
}

enum PartSetState {
    Complete(TranscodeJobSpec),
    Waiting { present: usize },
}

/// Submit one job and check the service's answer.
pub async fn submit_job(
    service: &dyn JobService,
    role: &str,
    spec: &TranscodeJobSpec,
) -> WorkerResult<SubmittedJob> {
    let reply = service.create_job(role, spec).await?;

    if !reply.is_success() {
        return Err(WorkerError::SubmissionRejected {
            status_code: reply.status_code,
            job_id: reply.job_id,
            message: reply.message,
        });
    }

    match reply.job_id {
        Some(job_id) => Ok(SubmittedJob {
            status_code: reply.status_code,
            job_id,
        }),
        None => Err(WorkerError::SubmissionRejected {
            status_code: reply.status_code,
            job_id: None,
            message: Some("service returned no job id".to_string()),
        }),
    }
}

/// Hands harvested playlists to the managed transcoding service.
pub struct ManagedJobSubmitter {
    store: Arc<dyn ObjectStore>,
    service: Arc<dyn JobService>,
    config: SubmitConfig,
}

impl ManagedJobSubmitter {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        service: Arc<dyn JobService>,
        config: SubmitConfig,
    ) -> Self {
        Self {
            store,
            service,
            config,
        }
    }

    pub fn config(&self) -> &SubmitConfig {
        &self.config
    }

    /// Submit a job for the event's manifest.
    ///
    /// A manifest that is one part of a multi-part harvest is only submitted
    /// once every part exists, as a single job over all parts.
    pub async fn submit(
        &self,
        event: &HarvestJobEvent,
        logger: &InvocationLogger,
    ) -> WorkerResult<SubmitOutcome> {
        let spec = match PartSet::parse(event.manifest_key()) {
            Some(part) => match self.part_set_spec(event, &part, logger).await? {
                PartSetState::Complete(spec) => spec,
                PartSetState::Waiting { present } => {
                    return Ok(SubmitOutcome::AwaitingParts {
                        present,
                        total: part.total,
                    })
                }
            },
            None => TranscodeJobSpec::for_harvest(event, &self.config.destination_bucket),
        };

        let job = submit_job(self.service.as_ref(), &self.config.role_arn, &spec).await?;
        info!(
            job_id = %job.job_id,
            inputs = spec.inputs.len(),
            "Submitted job writing to {}",
            spec.destination.uri()
        );
        Ok(SubmitOutcome::Submitted(job))
    }

    async fn part_set_spec(
        &self,
        event: &HarvestJobEvent,
        part: &PartSet,
        logger: &InvocationLogger,
    ) -> WorkerResult<PartSetState> {
        let bucket = event.source_bucket();
        let listing = self
            .store
            .list_objects(bucket, &part.listing_prefix())
            .await
            .map_err(|e| {
                WorkerError::list_failed(format!("s3://{}/{}: {}", bucket, part.base, e))
            })?;
        let keys = listing.iter().map(|o| o.key.as_str());

        match part.complete_parts(keys.clone()) {
            Some(parts) => {
                logger.log_progress(&format!("All {} parts of {} present", part.total, part.base));
                Ok(PartSetState::Complete(TranscodeJobSpec::for_parts(
                    bucket,
                    &parts,
                    &self.config.destination_bucket,
                    &part.base,
                )))
            }
            None => {
                let present = part.present_count(keys);
                logger.log_progress(&format!(
                    "{} of {} parts of {} present, waiting",
                    present, part.total, part.base
                ));
                Ok(PartSetState::Waiting { present })
            }
        }
    }
}

#[async_trait]
impl ArtifactProducer for ManagedJobSubmitter {
    fn operation(&self) -> &'static str {
        "submit"
    }

    async fn produce(
        &self,
        event: &HarvestJobEvent,
        _inputs: &ResolvedInputs,
        logger: &InvocationLogger,
    ) -> WorkerResult<InvocationResponse> {
        Ok(match self.submit(event, logger).await? {
            SubmitOutcome::Submitted(job) => {
                InvocationResponse::submitted(job.status_code, job.job_id)
            }
            SubmitOutcome::AwaitingParts { .. } => InvocationResponse::awaiting_parts(),
        })
    }
}
