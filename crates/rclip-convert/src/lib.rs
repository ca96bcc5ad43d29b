//! Managed transcoding service client.
//!
//! This crate provides:
//! - The `JobService` seam used by the managed job submitter
//! - Translation of a `TranscodeJobSpec` into MediaConvert job settings
//! - A MediaConvert-backed `JobService`

pub mod error;
pub mod mediaconvert;
pub mod service;

pub use error::{ConvertError, ConvertResult};
pub use mediaconvert::{job_settings, MediaConvertClient};
pub use service::{CreateJobReply, JobService};
