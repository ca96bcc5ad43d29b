//! Declarative description of a managed transcode job.
//!
//! Built once per invocation and handed to the managed service unchanged.
//! The service-specific client translates it into its own request types.

use serde::{Deserialize, Serialize};

use crate::event::HarvestJobEvent;
use crate::prefix::InputPrefix;

/// Maximum video bitrate (bits/s) for quality-defined VBR.
pub const DEFAULT_MAX_VIDEO_BITRATE: u32 = 12_000_000;
/// AAC bitrate (bits/s)
pub const DEFAULT_AUDIO_BITRATE: u32 = 128_000;
/// AAC sample rate (Hz)
pub const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 48_000;
/// Name shared by the input audio selector and the output audio source.
pub const AUDIO_SELECTOR_NAME: &str = "Audio Selector 1";
/// Name of the single file output group.
pub const OUTPUT_GROUP_NAME: &str = "File Group";

/// Object storage location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Location {
    pub bucket: String,
    pub key: String,
}

impl S3Location {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// `bucket/key`
    pub fn path(&self) -> String {
        format!("{}/{}", self.bucket, self.key)
    }

    /// `s3://bucket/key`
    pub fn uri(&self) -> String {
        format!("s3://{}", self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContainerType {
    Mp4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VideoCodec {
    H264,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateControlMode {
    Cbr,
    Vbr,
    Qvbr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SceneChangeDetect {
    Disabled,
    Enabled,
    TransitionDetection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioCodec {
    Aac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AacCodingMode {
    /// 1.0
    Mono,
    /// 2.0
    Stereo,
}

/// Video track settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSpec {
    pub codec: VideoCodec,
    pub max_bitrate: u32,
    pub rate_control: RateControlMode,
    pub scene_change_detect: SceneChangeDetect,
}

impl Default for VideoSpec {
    fn default() -> Self {
        Self {
            codec: VideoCodec::H264,
            max_bitrate: DEFAULT_MAX_VIDEO_BITRATE,
            rate_control: RateControlMode::Qvbr,
            scene_change_detect: SceneChangeDetect::TransitionDetection,
        }
    }
}

/// Audio track settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSpec {
    pub codec: AudioCodec,
    pub bitrate: u32,
    pub coding_mode: AacCodingMode,
    pub sample_rate: u32,
    /// Selector name on the input side, source name on the output side
    pub selector_name: String,
}

impl Default for AudioSpec {
    fn default() -> Self {
        Self {
            codec: AudioCodec::Aac,
            bitrate: DEFAULT_AUDIO_BITRATE,
            coding_mode: AacCodingMode::Stereo,
            sample_rate: DEFAULT_AUDIO_SAMPLE_RATE,
            selector_name: AUDIO_SELECTOR_NAME.to_string(),
        }
    }
}

/// Complete managed transcode job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeJobSpec {
    /// Inputs, concatenated in order
    pub inputs: Vec<S3Location>,
    pub video: VideoSpec,
    pub audio: AudioSpec,
    pub container: ContainerType,
    pub output_group_name: String,
    /// Destination folder; `key` ends in `/`
    pub destination: S3Location,
}

impl TranscodeJobSpec {
    /// Job for a single harvested manifest.
    ///
    /// The output lands in `destination_bucket` under the manifest's own
    /// prefix.
    pub fn for_harvest(event: &HarvestJobEvent, destination_bucket: &str) -> Self {
        Self::build(
            vec![S3Location::new(event.source_bucket(), event.manifest_key())],
            destination_bucket,
            event.prefix(),
        )
    }

    /// Job concatenating every part of a multi-part harvest.
    ///
    /// `part_keys` must already be in playback order.
    pub fn for_parts(
        source_bucket: &str,
        part_keys: &[String],
        destination_bucket: &str,
        destination_prefix: &InputPrefix,
    ) -> Self {
        let inputs = part_keys
            .iter()
            .map(|key| S3Location::new(source_bucket, key.as_str()))
            .collect();
        Self::build(inputs, destination_bucket, destination_prefix)
    }

    fn build(inputs: Vec<S3Location>, destination_bucket: &str, prefix: &InputPrefix) -> Self {
        Self {
            inputs,
            video: VideoSpec::default(),
            audio: AudioSpec::default(),
            container: ContainerType::Mp4,
            output_group_name: OUTPUT_GROUP_NAME.to_string(),
            destination: S3Location::new(destination_bucket, prefix.listing_prefix()),
        }
    }
}
