//! Object storage access for harvest inputs and stitched outputs.
//!
//! This crate provides:
//! - The `ObjectStore` seam used by the worker pipelines
//! - Paginated prefix listing
//! - Streaming download to and upload from local files
//! - An S3 implementation on the AWS SDK

pub mod client;
pub mod error;
pub mod store;

pub use client::{S3Config, S3Store};
pub use error::{StorageError, StorageResult};
pub use store::{ObjectInfo, ObjectStore};
