use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::Context;
use rclip_media::check_ffmpeg;
use rclip_worker::{StagingArea, StitchConfig, SubmitConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    if std::env::args().any(|arg| arg == "--managed") {
        let config = SubmitConfig::from_env().context("managed configuration")?;
        println!(
            "worker-selfcheck: managed path, destination={} role={}",
            config.destination_bucket, config.role_arn
        );
    } else {
        let config = StitchConfig::from_env().context("stitch configuration")?;
        println!(
            "worker-selfcheck: stitch path, destination={} work_dir={}",
            config.destination_bucket,
            config
                .work_dir
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<system temp>".to_string())
        );
        ensure_workdir(config.work_dir.as_deref()).await?;
        ensure_ffmpeg(config.ffmpeg_path)?;
    }

    println!("worker-selfcheck: ok");
    Ok(())
}

async fn ensure_workdir(root: Option<&Path>) -> anyhow::Result<()> {
    let staging = StagingArea::create(root).context("work dir is not writable")?;
    let probe = staging.input_path("selfcheck");
    tokio::fs::write(&probe, b"ok").await?;
    staging.release()?;
    Ok(())
}

fn ensure_ffmpeg(configured: Option<PathBuf>) -> anyhow::Result<()> {
    let program = match configured {
        Some(path) => path,
        None => check_ffmpeg()?,
    };

    let output = Command::new(&program)
        .arg("-version")
        .output()
        .map_err(|e| anyhow::anyhow!("{} not available: {}", program.display(), e))?;

    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "{} -version failed: {:?}",
            program.display(),
            output.status
        ));
    }
    Ok(())
}
