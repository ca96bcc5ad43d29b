//! Invocation pipeline: decode, resolve, produce.

use std::sync::Arc;

use async_trait::async_trait;
use rclip_models::{decode_event, HarvestJobEvent};
use rclip_storage::ObjectStore;
use serde_json::Value;
use tracing::Instrument;

use crate::error::WorkerResult;
use crate::logging::InvocationLogger;
use crate::resolver::{resolve_inputs, ResolvedInputs};
use crate::response::InvocationResponse;

/// Turns a resolved harvest into an artifact: either a stitched file or a
/// managed transcode job.
#[async_trait]
pub trait ArtifactProducer: Send + Sync {
    /// Operation name used in logs.
    fn operation(&self) -> &'static str;

    async fn produce(
        &self,
        event: &HarvestJobEvent,
        inputs: &ResolvedInputs,
        logger: &InvocationLogger,
    ) -> WorkerResult<InvocationResponse>;
}

/// Strictly sequential handling of one event per invocation.
pub struct Pipeline<P> {
    store: Arc<dyn ObjectStore>,
    producer: P,
}

impl<P: ArtifactProducer> Pipeline<P> {
    pub fn new(store: Arc<dyn ObjectStore>, producer: P) -> Self {
        Self { store, producer }
    }

    pub fn producer(&self) -> &P {
        &self.producer
    }

    /// Handle one raw event.
    ///
    /// The event is decoded before any storage call is made.
    pub async fn handle(&self, raw: &Value, request_id: &str) -> WorkerResult<InvocationResponse> {
        let logger = InvocationLogger::new(request_id, self.producer.operation());
        let span = logger.span().clone();

        let result: WorkerResult<InvocationResponse> = async {
            let event = decode_event(raw)?;
            logger.record_event(&event);
            logger.log_start(&event.source_uri());

            let inputs = resolve_inputs(self.store.as_ref(), &event).await?;
            logger.log_progress(&format!("{} inputs under {}", inputs.len(), inputs.prefix));

            let response = self.producer.produce(&event, &inputs, &logger).await?;
            logger.log_completion(&format!("status {}", response.status_code));
            Ok(response)
        }
        .instrument(span)
        .await;

        if let Err(e) = &result {
            logger.log_error(&e.to_string());
        }
        result
    }

    /// Handle one raw event and shape the outcome for the invoking
    /// environment.
    ///
    /// Fatal failures become a response carrying the failure's status code.
    /// Retryable failures stay errors so the invocation is retried.
    pub async fn invoke(&self, raw: &Value, request_id: &str) -> WorkerResult<InvocationResponse> {
        match self.handle(raw, request_id).await {
            Ok(response) => Ok(response),
            Err(e) if e.is_retryable() => Err(e),
            Err(e) => Ok(InvocationResponse::from_error(&e)),
        }
    }
}
