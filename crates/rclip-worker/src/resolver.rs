//! Manifest input resolution.

use rclip_models::{HarvestJobEvent, InputPrefix};
use rclip_storage::ObjectStore;
use tracing::{debug, warn};

use crate::error::{WorkerError, WorkerResult};

/// Objects sharing the manifest's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    /// Directory portion of the manifest key
    pub prefix: InputPrefix,
    /// Every object key under the prefix, in listing order
    pub keys: Vec<String>,
}

impl ResolvedInputs {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// List every object that shares the manifest's directory.
///
/// Follows all listing pages. Directory markers and keys outside the prefix
/// are dropped; an empty result is `NoInputsFound`, and a listing that does
/// not contain the manifest itself is `ManifestNotListed`.
pub async fn resolve_inputs(
    store: &dyn ObjectStore,
    event: &HarvestJobEvent,
) -> WorkerResult<ResolvedInputs> {
    let prefix = event.prefix().clone();
    let bucket = event.source_bucket();

    let listing = store
        .list_objects(bucket, &prefix.listing_prefix())
        .await
        .map_err(|e| WorkerError::list_failed(format!("s3://{}/{}: {}", bucket, prefix, e)))?;

    let mut keys = Vec::with_capacity(listing.len());
    for object in listing {
        if object.key.ends_with('/') {
            debug!("Skipping directory marker {}", object.key);
        } else if !prefix.contains(&object.key) {
            warn!("Listing returned {} outside prefix {}", object.key, prefix);
        } else {
            keys.push(object.key);
        }
    }

    if keys.is_empty() {
        return Err(WorkerError::no_inputs_found(bucket, prefix.as_str()));
    }

    if !keys.iter().any(|k| k == event.manifest_key()) {
        return Err(WorkerError::ManifestNotListed(event.source_uri()));
    }

    debug!("Resolved {} inputs under {}", keys.len(), prefix);
    Ok(ResolvedInputs { prefix, keys })
}
