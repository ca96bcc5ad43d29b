use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use rclip_convert::MediaConvertClient;
use rclip_storage::{ObjectStore, S3Store};
use rclip_worker::{init_tracing, ManagedJobSubmitter, Pipeline, SubmitConfig};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match SubmitConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn ObjectStore> = Arc::new(S3Store::from_env().await);
    let service = Arc::new(MediaConvertClient::from_env().await);
    info!(
        destination = %config.destination_bucket,
        role = %config.role_arn,
        "Starting job submitter"
    );
    let submitter = ManagedJobSubmitter::new(Arc::clone(&store), service, config);
    let pipeline = Pipeline::new(store, submitter);
    let pipeline = &pipeline;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        pipeline
            .invoke(&event.payload, &event.context.request_id)
            .await
            .map_err(Error::from)
    }))
    .await
}
