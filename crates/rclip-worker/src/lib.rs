//! Harvest transcode trigger.
//!
//! This crate provides:
//! - Event handling pipeline (decode, resolve inputs, produce artifact)
//! - Local stitching through FFmpeg with a scoped staging area
//! - Managed transcode job submission, including multi-part harvests
//! - Configuration, error taxonomy and structured invocation logging

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod resolver;
pub mod response;
pub mod staging;
pub mod stitch;
pub mod submit;

pub use config::{StitchConfig, SubmitConfig, DEFAULT_CONTENT_TYPE};
pub use error::{WorkerError, WorkerResult};
pub use logging::{init_tracing, InvocationLogger};
pub use pipeline::{ArtifactProducer, Pipeline};
pub use resolver::{resolve_inputs, ResolvedInputs};
pub use response::{InvocationResponse, STATUS_AWAITING_PARTS, STATUS_OK};
pub use staging::StagingArea;
pub use stitch::{LocalStitchWorker, OutputArtifact};
pub use submit::{submit_job, ManagedJobSubmitter, SubmitOutcome, SubmittedJob};
