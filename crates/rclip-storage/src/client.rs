//! S3 client implementation.

use std::path::Path;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::store::{ObjectInfo, ObjectStore};

/// Configuration for the S3 client.
///
/// Credentials and region always come from the default AWS provider chain;
/// only the endpoint can be overridden.
#[derive(Debug, Clone, Default)]
pub struct S3Config {
    /// Endpoint override (S3-compatible stores); enables path-style addressing
    pub endpoint_url: Option<String>,
}

impl S3Config {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            endpoint_url: std::env::var("S3_ENDPOINT_URL")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }
}

/// S3-backed object store.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Create a store using the default AWS configuration chain.
    pub async fn new(config: S3Config) -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let mut builder = Builder::from(&sdk_config);
        if let Some(endpoint) = config.endpoint_url {
            info!("Using S3 endpoint override: {}", endpoint);
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }

    /// Create from environment variables.
    pub async fn from_env() -> Self {
        Self::new(S3Config::from_env()).await
    }

    /// Create a store for an S3-compatible endpoint with fixed credentials.
    ///
    /// Intended for local stores (MinIO) and tests.
    pub fn with_static_credentials(
        endpoint_url: &str,
        region: &str,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "static");

        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(endpoint_url)
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(sdk_config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_objects(&self, bucket: &str, prefix: &str) -> StorageResult<Vec<ObjectInfo>> {
        debug!("Listing objects in {} with prefix: {}", bucket, prefix);

        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix);

            if let Some(token) = continuation_token {
                request = request.continuation_token(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| StorageError::list_failed(DisplayErrorContext(&e).to_string()))?;
            pages += 1;

            for obj in response.contents() {
                if let Some(key) = obj.key() {
                    objects.push(ObjectInfo::new(key, obj.size().unwrap_or(0).max(0) as u64));
                }
            }

            match (response.is_truncated(), response.next_continuation_token) {
                (Some(true), Some(token)) => continuation_token = Some(token),
                (Some(true), None) => {
                    return Err(StorageError::list_failed(format!(
                        "truncated listing of {}/{} without continuation token",
                        bucket, prefix
                    )));
                }
                _ => break,
            }
        }

        debug!("Listed {} objects in {} page(s)", objects.len(), pages);
        Ok(objects)
    }

    async fn download_file(&self, bucket: &str, key: &str, path: &Path) -> StorageResult<()> {
        debug!("Downloading {}/{} to {}", bucket, key, path.display());

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    StorageError::not_found(key)
                } else {
                    StorageError::download_failed(DisplayErrorContext(&e).to_string())
                }
            })?;

        let mut file = tokio::fs::File::create(path).await?;
        let mut body = response.body.into_async_read();

        let bytes = tokio::io::copy(&mut body, &mut file)
            .await
            .map_err(|e| StorageError::download_failed(format!("{}: {}", key, e)))?;
        file.flush().await?;

        debug!("Downloaded {} ({} bytes)", key, bytes);
        Ok(())
    }

    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<()> {
        debug!("Uploading {} to {}/{}", path.display(), bucket, key);

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::upload_failed(DisplayErrorContext(&e).to_string()))?;

        info!("Uploaded {} to {}/{}", path.display(), bucket, key);
        Ok(())
    }
}
