//! MediaConvert-backed job service.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_mediaconvert::config::{Builder, Region};
use aws_sdk_mediaconvert::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_mediaconvert::types::{
    AacCodingMode, AacSettings, AudioCodec, AudioCodecSettings, AudioDefaultSelection,
    AudioDescription, AudioSelector, ContainerSettings, ContainerType, DestinationSettings,
    FileGroupSettings, H264RateControlMode, H264SceneChangeDetect, H264Settings, Input,
    InputTimecodeSource, JobSettings, Output, OutputGroup, OutputGroupSettings, OutputGroupType,
    S3DestinationSettings, S3StorageClass, TimecodeConfig, TimecodeSource, VideoCodec,
    VideoCodecSettings, VideoDescription,
};
use aws_sdk_mediaconvert::Client;
use rclip_models::job_spec::{self, RateControlMode, SceneChangeDetect};
use rclip_models::{JobId, TranscodeJobSpec};
use tracing::{debug, info, warn};

use crate::error::{ConvertError, ConvertResult};
use crate::service::{CreateJobReply, JobService};

/// Status reported for an accepted CreateJob.
///
/// The SDK only hands back an output for a success response and does not
/// expose its HTTP status; CreateJob is defined to answer 201.
pub const CREATE_JOB_SUCCESS_STATUS: u16 = 201;

/// MediaConvert client.
#[derive(Clone)]
pub struct MediaConvertClient {
    client: Client,
}

impl MediaConvertClient {
    /// Create a client from the default AWS configuration chain.
    ///
    /// `endpoint_url` overrides the regional endpoint (account-specific
    /// endpoints on older accounts).
    pub async fn new(endpoint_url: Option<String>) -> Self {
        let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let mut builder = Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint_url {
            info!("Using MediaConvert endpoint override: {}", endpoint);
            builder = builder.endpoint_url(endpoint);
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }

    /// Create from environment variables (`MEDIACONVERT_ENDPOINT`).
    pub async fn from_env() -> Self {
        let endpoint = std::env::var("MEDIACONVERT_ENDPOINT")
            .ok()
            .filter(|v| !v.is_empty());
        Self::new(endpoint).await
    }

    /// Create a client for a fixed endpoint with fixed credentials.
    ///
    /// Intended for account-specific endpoints outside the default chain
    /// and for tests.
    pub fn with_static_credentials(
        endpoint_url: &str,
        region: &str,
        access_key_id: &str,
        secret_access_key: &str,
    ) -> Self {
        let credentials = Credentials::new(access_key_id, secret_access_key, None, None, "static");

        let config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(endpoint_url)
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .build();

        Self {
            client: Client::from_conf(config),
        }
    }
}

#[async_trait]
impl JobService for MediaConvertClient {
    async fn create_job(
        &self,
        role: &str,
        spec: &TranscodeJobSpec,
    ) -> ConvertResult<CreateJobReply> {
        let settings = job_settings(spec)?;
        debug!("Submitting MediaConvert job: {:?}", settings);

        match self
            .client
            .create_job()
            .role(role)
            .settings(settings)
            .send()
            .await
        {
            Ok(output) => {
                let job_id = output
                    .job()
                    .and_then(|job| job.id())
                    .map(JobId::from_string);
                info!(job_id = ?job_id, "MediaConvert accepted job");
                Ok(CreateJobReply::accepted(CREATE_JOB_SUCCESS_STATUS, job_id))
            }
            Err(err) => {
                let status = err.raw_response().map(|raw| raw.status().as_u16());
                match (err.as_service_error(), status) {
                    (Some(service_err), Some(status)) => {
                        let message = format!(
                            "{}: {}",
                            service_err.code().unwrap_or("Unknown"),
                            service_err.message().unwrap_or("no message")
                        );
                        warn!(status, "MediaConvert rejected job: {}", message);
                        Ok(CreateJobReply::rejected(status, message))
                    }
                    _ => Err(ConvertError::transport(DisplayErrorContext(&err).to_string())),
                }
            }
        }
    }
}

fn to_i32(value: u32, field: &str) -> ConvertResult<i32> {
    i32::try_from(value)
        .map_err(|_| ConvertError::invalid_spec(format!("{} out of range: {}", field, value)))
}

/// Translate a declarative job spec into MediaConvert job settings.
pub fn job_settings(spec: &TranscodeJobSpec) -> ConvertResult<JobSettings> {
    if spec.inputs.is_empty() {
        return Err(ConvertError::invalid_spec("job has no inputs"));
    }

    let container = match spec.container {
        job_spec::ContainerType::Mp4 => ContainerType::Mp4,
    };
    let video_codec = match spec.video.codec {
        job_spec::VideoCodec::H264 => VideoCodec::H264,
    };
    let rate_control = match spec.video.rate_control {
        RateControlMode::Cbr => H264RateControlMode::Cbr,
        RateControlMode::Vbr => H264RateControlMode::Vbr,
        RateControlMode::Qvbr => H264RateControlMode::Qvbr,
    };
    let scene_change_detect = match spec.video.scene_change_detect {
        SceneChangeDetect::Disabled => H264SceneChangeDetect::Disabled,
        SceneChangeDetect::Enabled => H264SceneChangeDetect::Enabled,
        SceneChangeDetect::TransitionDetection => H264SceneChangeDetect::TransitionDetection,
    };
    let audio_codec = match spec.audio.codec {
        job_spec::AudioCodec::Aac => AudioCodec::Aac,
    };
    let coding_mode = match spec.audio.coding_mode {
        job_spec::AacCodingMode::Mono => AacCodingMode::CodingMode10,
        job_spec::AacCodingMode::Stereo => AacCodingMode::CodingMode20,
    };

    let output = Output::builder()
        .container_settings(ContainerSettings::builder().container(container).build())
        .video_description(
            VideoDescription::builder()
                .codec_settings(
                    VideoCodecSettings::builder()
                        .codec(video_codec)
                        .h264_settings(
                            H264Settings::builder()
                                .max_bitrate(to_i32(spec.video.max_bitrate, "max_bitrate")?)
                                .rate_control_mode(rate_control)
                                .scene_change_detect(scene_change_detect)
                                .build(),
                        )
                        .build(),
                )
                .build(),
        )
        .audio_descriptions(
            AudioDescription::builder()
                .audio_source_name(&spec.audio.selector_name)
                .codec_settings(
                    AudioCodecSettings::builder()
                        .codec(audio_codec)
                        .aac_settings(
                            AacSettings::builder()
                                .bitrate(to_i32(spec.audio.bitrate, "audio bitrate")?)
                                .coding_mode(coding_mode)
                                .sample_rate(to_i32(spec.audio.sample_rate, "sample_rate")?)
                                .build(),
                        )
                        .build(),
                )
                .build(),
        )
        .build();

    let output_group = OutputGroup::builder()
        .name(&spec.output_group_name)
        .outputs(output)
        .output_group_settings(
            OutputGroupSettings::builder()
                .r#type(OutputGroupType::FileGroupSettings)
                .file_group_settings(
                    FileGroupSettings::builder()
                        .destination(spec.destination.uri())
                        .destination_settings(
                            DestinationSettings::builder()
                                .s3_settings(
                                    S3DestinationSettings::builder()
                                        .storage_class(S3StorageClass::Standard)
                                        .build(),
                                )
                                .build(),
                        )
                        .build(),
                )
                .build(),
        )
        .build();

    let inputs = spec
        .inputs
        .iter()
        .map(|location| {
            Input::builder()
                .audio_selectors(
                    &spec.audio.selector_name,
                    AudioSelector::builder()
                        .default_selection(AudioDefaultSelection::Default)
                        .build(),
                )
                .timecode_source(InputTimecodeSource::Zerobased)
                .file_input(location.uri())
                .build()
        })
        .collect();

    Ok(JobSettings::builder()
        .timecode_config(TimecodeConfig::builder().source(TimecodeSource::Zerobased).build())
        .output_groups(output_group)
        .follow_source(1)
        .set_inputs(Some(inputs))
        .build())
}
