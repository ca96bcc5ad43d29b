//! Harvest-completion event decoding.

use serde::Serialize;
use serde_json::Value;

use crate::error::{DecodeError, DecodeResult};
use crate::prefix::InputPrefix;

const BUCKET_PATH: &str = "detail.harvest_job.s3_destination.bucket_name";
const MANIFEST_KEY_PATH: &str = "detail.harvest_job.s3_destination.manifest_key";

/// Source location of a completed harvest job.
///
/// Only constructed through [`decode_event`] (or [`HarvestJobEvent::new`]),
/// so both fields are always non-empty and the manifest key always has a
/// directory component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HarvestJobEvent {
    source_bucket: String,
    manifest_key: String,
    #[serde(skip)]
    prefix: InputPrefix,
}

impl HarvestJobEvent {
    /// Build an event from already extracted fields, applying the same
    /// validation as [`decode_event`].
    pub fn new(
        source_bucket: impl Into<String>,
        manifest_key: impl Into<String>,
    ) -> DecodeResult<Self> {
        let source_bucket = source_bucket.into();
        let manifest_key = manifest_key.into();

        if source_bucket.is_empty() {
            return Err(DecodeError::EmptyField(BUCKET_PATH));
        }
        if manifest_key.is_empty() {
            return Err(DecodeError::EmptyField(MANIFEST_KEY_PATH));
        }
        let prefix = InputPrefix::from_manifest_key(&manifest_key)?;

        Ok(Self {
            source_bucket,
            manifest_key,
            prefix,
        })
    }

    pub fn source_bucket(&self) -> &str {
        &self.source_bucket
    }

    pub fn manifest_key(&self) -> &str {
        &self.manifest_key
    }

    /// Directory portion of the manifest key.
    pub fn prefix(&self) -> &InputPrefix {
        &self.prefix
    }

    /// `s3://bucket/key` form of the manifest location.
    pub fn source_uri(&self) -> String {
        format!("s3://{}/{}", self.source_bucket, self.manifest_key)
    }
}

/// Extract the harvest job's source location from a raw trigger payload.
///
/// Pure function: performs no I/O, so a rejected event never reaches storage.
pub fn decode_event(raw: &Value) -> DecodeResult<HarvestJobEvent> {
    let destination = raw
        .get("detail")
        .and_then(|detail| detail.get("harvest_job"))
        .and_then(|job| job.get("s3_destination"));

    let bucket = string_leaf(destination, "bucket_name", BUCKET_PATH)?;
    let manifest_key = string_leaf(destination, "manifest_key", MANIFEST_KEY_PATH)?;

    HarvestJobEvent::new(bucket, manifest_key)
}

fn string_leaf<'a>(
    parent: Option<&'a Value>,
    field: &str,
    path: &'static str,
) -> DecodeResult<&'a str> {
    match parent.and_then(|p| p.get(field)) {
        None | Some(Value::Null) => Err(DecodeError::MissingField(path)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(DecodeError::NotAString(path)),
    }
}
