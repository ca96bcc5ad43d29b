//! In-memory fakes shared by the pipeline tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use rclip_media::{MediaError, MediaResult, Transcoder};
use rclip_storage::{ObjectInfo, ObjectStore, StorageError, StorageResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List { bucket: String, prefix: String },
    Download { bucket: String, key: String },
    Upload { bucket: String, key: String, content_type: String },
}

/// Object store backed by a map of `(bucket, key)` to bytes.
#[derive(Default)]
pub struct FakeStore {
    objects: Mutex<BTreeMap<(String, String), Vec<u8>>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_download: Option<String>,
    fail_upload: bool,
    fail_list: bool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, bucket: &str, key: &str, body: &[u8]) -> Self {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body.to_vec());
        self
    }

    pub fn failing_download(mut self, key: &str) -> Self {
        self.fail_download = Some(key.to_string());
        self
    }

    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn downloads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Download { key, .. } => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Upload { bucket, key, .. } => Some((bucket, key)),
                _ => None,
            })
            .collect()
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<ObjectInfo>> {
        self.calls.lock().unwrap().push(StoreCall::List {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        });
        if self.fail_list {
            return Err(StorageError::list_failed("connection reset"));
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, k), body)| ObjectInfo::new(k.clone(), body.len() as u64))
            .collect())
    }

    async fn download_file(&self, bucket: &str, key: &str, path: &Path) -> StorageResult<()> {
        self.calls.lock().unwrap().push(StoreCall::Download {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if self.fail_download.as_deref() == Some(key) {
            return Err(StorageError::download_failed("connection reset"));
        }

        let body = self
            .object(bucket, key)
            .ok_or_else(|| StorageError::not_found(key))?;
        std::fs::write(path, body)?;
        Ok(())
    }

    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        self.calls.lock().unwrap().push(StoreCall::Upload {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
        });
        if self.fail_upload {
            return Err(StorageError::upload_failed("slow down"));
        }

        let body = std::fs::read(path)?;
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }
}

/// Transcoder that concatenates every staged file next to the manifest.
#[derive(Default)]
pub struct FakeTranscoder {
    fail_exit_code: Option<i32>,
    runs: Mutex<Vec<(PathBuf, PathBuf, Vec<String>)>>,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(exit_code: i32) -> Self {
        Self {
            fail_exit_code: Some(exit_code),
            ..Self::default()
        }
    }

    /// `(manifest, output, staged file names)` per run.
    pub fn runs(&self) -> Vec<(PathBuf, PathBuf, Vec<String>)> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn transcode(&self, manifest: &Path, output: &Path) -> MediaResult<()> {
        let dir = manifest.parent().unwrap();
        let mut names: Vec<String> = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().to_string()))
            .collect::<Result<_, _>>()?;
        names.sort();
        self.runs
            .lock()
            .unwrap()
            .push((manifest.to_path_buf(), output.to_path_buf(), names.clone()));

        if let Some(code) = self.fail_exit_code {
            return Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some("game.hls: Invalid data found when processing input".to_string()),
                Some(code),
            ));
        }
        if !manifest.exists() {
            return Err(MediaError::FileNotFound(manifest.to_path_buf()));
        }

        let mut body = Vec::new();
        for name in &names {
            body.extend(std::fs::read(dir.join(name))?);
        }
        std::fs::write(output, body)?;
        Ok(())
    }
}

/// Number of entries directly under `dir`.
pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

pub fn harvest_event(bucket: &str, manifest_key: &str) -> serde_json::Value {
    serde_json::json!({
        "version": "0",
        "detail-type": "MediaPackage HarvestJob Notification",
        "source": "aws.mediapackage",
        "detail": {
            "harvest_job": {
                "id": "harvest-1",
                "status": "SUCCEEDED",
                "s3_destination": {
                    "bucket_name": bucket,
                    "manifest_key": manifest_key,
                    "role_arn": "arn:aws:iam::123456789012:role/harvest"
                }
            }
        }
    })
}
