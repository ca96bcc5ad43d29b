//! Shared data models for the harvest transcode trigger.
//!
//! This crate provides:
//! - Decoding of harvest-completion events
//! - Input prefix and output naming rules
//! - The declarative managed transcode job description
//! - Multi-part harvest key parsing

pub mod error;
pub mod event;
pub mod job;
pub mod job_spec;
pub mod part_set;
pub mod prefix;

// Re-export common types
pub use error::{DecodeError, DecodeResult};
pub use event::{decode_event, HarvestJobEvent};
pub use job::JobId;
pub use job_spec::{AudioSpec, ContainerType, S3Location, TranscodeJobSpec, VideoSpec};
pub use part_set::PartSet;
pub use prefix::{base_name, InputPrefix, OUTPUT_EXTENSION};
