//! Local stitching: download, transcode, upload.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rclip_media::Transcoder;
use rclip_models::{base_name, HarvestJobEvent, S3Location};
use rclip_storage::ObjectStore;
use tracing::{info, warn};

use crate::config::StitchConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::InvocationLogger;
use crate::pipeline::ArtifactProducer;
use crate::resolver::ResolvedInputs;
use crate::response::InvocationResponse;
use crate::staging::StagingArea;

/// Uploaded stitch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub location: S3Location,
}

/// Stitches a harvested playlist into one container file.
pub struct LocalStitchWorker {
    store: Arc<dyn ObjectStore>,
    transcoder: Arc<dyn Transcoder>,
    config: StitchConfig,
}

impl LocalStitchWorker {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        transcoder: Arc<dyn Transcoder>,
        config: StitchConfig,
    ) -> Self {
        Self {
            store,
            transcoder,
            config,
        }
    }

    pub fn config(&self) -> &StitchConfig {
        &self.config
    }

    /// Stitch the resolved inputs and upload the result.
    ///
    /// The staging area lives exactly as long as this call, on success and
    /// on every failure.
    pub async fn stitch(
        &self,
        event: &HarvestJobEvent,
        inputs: &ResolvedInputs,
        logger: &InvocationLogger,
    ) -> WorkerResult<OutputArtifact> {
        let staging = StagingArea::create(self.config.work_dir.as_deref())?;
        let result = self.stitch_in(&staging, event, inputs, logger).await;

        if let Err(e) = staging.release() {
            logger.log_warning(&format!("Failed to remove staging area: {}", e));
        }
        result
    }

    async fn stitch_in(
        &self,
        staging: &StagingArea,
        event: &HarvestJobEvent,
        inputs: &ResolvedInputs,
        logger: &InvocationLogger,
    ) -> WorkerResult<OutputArtifact> {
        let bucket = event.source_bucket();

        // Inputs are flattened to their base names: a later key with the
        // same name overwrites an earlier one.
        let mut staged: HashMap<&str, &str> = HashMap::with_capacity(inputs.len());
        for key in &inputs.keys {
            let name = base_name(key).ok_or_else(|| WorkerError::InvalidObjectKey(key.clone()))?;
            if let Some(previous) = staged.insert(name, key) {
                warn!("{} overwrites {} in staging (same base name)", key, previous);
            }

            self.store
                .download_file(bucket, key, &staging.input_path(name))
                .await
                .map_err(|e| WorkerError::download_failed(format!("{}: {}", key, e)))?;
        }
        logger.log_progress(&format!("Downloaded {} objects", inputs.len()));

        let manifest_name = base_name(event.manifest_key())
            .ok_or_else(|| WorkerError::InvalidObjectKey(event.manifest_key().to_string()))?;
        let output_name = inputs.prefix.output_file_name();
        let output_path = staging.output_path(&output_name);

        self.transcoder
            .transcode(&staging.input_path(manifest_name), &output_path)
            .await?;
        logger.log_progress(&format!("Transcoded {}", output_name));

        let location = S3Location::new(&self.config.destination_bucket, &output_name);
        self.store
            .upload_file(
                &location.bucket,
                &location.key,
                &output_path,
                &self.config.content_type,
            )
            .await
            .map_err(|e| WorkerError::upload_failed(format!("{}: {}", location.uri(), e)))?;

        info!("Uploaded {}", location.uri());
        Ok(OutputArtifact { location })
    }
}

#[async_trait]
impl ArtifactProducer for LocalStitchWorker {
    fn operation(&self) -> &'static str {
        "stitch"
    }

    async fn produce(
        &self,
        event: &HarvestJobEvent,
        inputs: &ResolvedInputs,
        logger: &InvocationLogger,
    ) -> WorkerResult<InvocationResponse> {
        let artifact = self.stitch(event, inputs, logger).await?;
        Ok(InvocationResponse::stitched(artifact.location.key))
    }
}
