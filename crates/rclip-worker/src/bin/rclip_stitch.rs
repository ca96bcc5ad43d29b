use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use rclip_media::{FfmpegRunner, FfmpegTranscoder};
use rclip_storage::{ObjectStore, S3Store};
use rclip_worker::{init_tracing, LocalStitchWorker, Pipeline, StitchConfig};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match StitchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let runner = match &config.ffmpeg_path {
        Some(path) => FfmpegRunner::new(path),
        None => FfmpegRunner::from_path()?,
    };
    info!("Using FFmpeg at {}", runner.program().display());
    let transcoder = FfmpegTranscoder::new(runner).with_output_args(config.output_args.clone());

    let store: Arc<dyn ObjectStore> = Arc::new(S3Store::from_env().await);
    info!(
        destination = %config.destination_bucket,
        "Starting stitch worker"
    );
    let worker = LocalStitchWorker::new(Arc::clone(&store), Arc::new(transcoder), config);
    let pipeline = Pipeline::new(store, worker);
    let pipeline = &pipeline;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        pipeline
            .invoke(&event.payload, &event.context.request_id)
            .await
            .map_err(Error::from)
    }))
    .await
}
