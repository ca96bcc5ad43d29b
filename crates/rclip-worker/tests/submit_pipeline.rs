//! Managed submission pipeline with a mocked job service.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{harvest_event, FakeStore, StoreCall};
use mockall::mock;
use rclip_convert::{ConvertError, ConvertResult, CreateJobReply, JobService};
use rclip_models::{JobId, TranscodeJobSpec};
use rclip_worker::{ManagedJobSubmitter, Pipeline, SubmitConfig, WorkerError};

const SOURCE: &str = "src";
const DESTINATION: &str = "dst";
const ROLE: &str = "arn:aws:iam::123456789012:role/convert";

mock! {
    pub Jobs {}

    #[async_trait]
    impl JobService for Jobs {
        async fn create_job(
            &self,
            role: &str,
            spec: &TranscodeJobSpec,
        ) -> ConvertResult<CreateJobReply>;
    }
}

fn config() -> SubmitConfig {
    SubmitConfig {
        destination_bucket: DESTINATION.to_string(),
        role_arn: ROLE.to_string(),
    }
}

fn submit_pipeline(
    store: FakeStore,
    jobs: MockJobs,
) -> (Arc<FakeStore>, Pipeline<ManagedJobSubmitter>) {
    let store = Arc::new(store);
    let submitter = ManagedJobSubmitter::new(store.clone(), Arc::new(jobs), config());
    (store.clone(), Pipeline::new(store, submitter))
}

#[tokio::test]
async fn test_submit_single_manifest() {
    let store = FakeStore::new()
        .with_object(SOURCE, "a/b/manifest.hls", b"#EXTM3U\n")
        .with_object(SOURCE, "a/b/seg1.ts", b"seg1");

    let mut jobs = MockJobs::new();
    jobs.expect_create_job()
        .withf(|role, spec| {
            role == ROLE
                && spec.destination.path() == "dst/a/b/"
                && spec.inputs.len() == 1
                && spec.inputs[0].uri() == "s3://src/a/b/manifest.hls"
        })
        .times(1)
        .returning(|_, _| {
            Ok(CreateJobReply::accepted(
                201,
                Some(JobId::from_string("1700000000000-abc123")),
            ))
        });

    let (store, pipeline) = submit_pipeline(store, jobs);
    let response = pipeline
        .handle(&harvest_event(SOURCE, "a/b/manifest.hls"), "req-1")
        .await
        .unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(response.job_id, Some(JobId::from_string("1700000000000-abc123")));
    assert!(store.downloads().is_empty());
    assert!(store.uploads().is_empty());
}

#[tokio::test]
async fn test_rejected_submission_surfaces_status() {
    let store = FakeStore::new().with_object(SOURCE, "a/b/manifest.hls", b"#EXTM3U\n");

    let mut jobs = MockJobs::new();
    jobs.expect_create_job()
        .times(2)
        .returning(|_, _| {
            Ok(CreateJobReply::rejected(
                403,
                "AccessDeniedException: role not assumable",
            ))
        });

    let (_, pipeline) = submit_pipeline(store, jobs);
    let event = harvest_event(SOURCE, "a/b/manifest.hls");

    let err = pipeline.handle(&event, "req-1").await.unwrap_err();
    assert!(matches!(
        err,
        WorkerError::SubmissionRejected { status_code: 403, job_id: None, .. }
    ));

    let response = pipeline.invoke(&event, "req-2").await.unwrap();
    assert_eq!(response.status_code, 403);
    assert!(response.error.unwrap().contains("AccessDeniedException"));
}

#[tokio::test]
async fn test_missing_job_id_is_rejection() {
    let store = FakeStore::new().with_object(SOURCE, "a/b/manifest.hls", b"#EXTM3U\n");

    let mut jobs = MockJobs::new();
    jobs.expect_create_job()
        .returning(|_, _| Ok(CreateJobReply::accepted(201, None)));

    let (_, pipeline) = submit_pipeline(store, jobs);
    let err = pipeline
        .handle(&harvest_event(SOURCE, "a/b/manifest.hls"), "req-1")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkerError::SubmissionRejected { status_code: 201, .. }));
}

#[tokio::test]
async fn test_transport_failure_is_retried() {
    let store = FakeStore::new().with_object(SOURCE, "a/b/manifest.hls", b"#EXTM3U\n");

    let mut jobs = MockJobs::new();
    jobs.expect_create_job()
        .returning(|_, _| Err(ConvertError::transport("dispatch failure")));

    let (_, pipeline) = submit_pipeline(store, jobs);
    let err = pipeline
        .invoke(&harvest_event(SOURCE, "a/b/manifest.hls"), "req-1")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkerError::SubmissionFailed(_)));
}

#[tokio::test]
async fn test_malformed_event_never_submits() {
    let mut jobs = MockJobs::new();
    jobs.expect_create_job().never();

    let (store, pipeline) = submit_pipeline(FakeStore::new(), jobs);
    let err = pipeline
        .handle(&serde_json::json!({"detail": {}}), "req-1")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkerError::MalformedEvent(_)));
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_incomplete_part_set_waits() {
    let store = FakeStore::new()
        .with_object(SOURCE, "show/1_3/main.m3u8", b"#EXTM3U\n")
        .with_object(SOURCE, "show/2_3/main.m3u8", b"#EXTM3U\n");

    let mut jobs = MockJobs::new();
    jobs.expect_create_job().never();

    let (store, pipeline) = submit_pipeline(store, jobs);
    let response = pipeline
        .handle(&harvest_event(SOURCE, "show/2_3/main.m3u8"), "req-1")
        .await
        .unwrap();

    assert_eq!(response.status_code, 202);
    assert!(response.job_id.is_none());
    assert!(store.calls().contains(&StoreCall::List {
        bucket: SOURCE.to_string(),
        prefix: "show/".to_string(),
    }));
}

#[tokio::test]
async fn test_complete_part_set_submits_all_parts_in_order() {
    let store = FakeStore::new()
        .with_object(SOURCE, "show/10_10/main.m3u8", b"#EXTM3U\n")
        .with_object(SOURCE, "show/2_2/main.m3u8", b"#EXTM3U\n")
        .with_object(SOURCE, "show/1_2/main.m3u8", b"#EXTM3U\n")
        .with_object(SOURCE, "show/1_2/seg1.ts", b"seg1");

    let mut jobs = MockJobs::new();
    jobs.expect_create_job()
        .withf(|_, spec| {
            let inputs: Vec<String> = spec.inputs.iter().map(|i| i.uri()).collect();
            inputs == ["s3://src/show/1_2/main.m3u8", "s3://src/show/2_2/main.m3u8"]
                && spec.destination.uri() == "s3://dst/show/"
        })
        .times(1)
        .returning(|_, _| Ok(CreateJobReply::accepted(201, Some(JobId::from_string("job-parts")))));

    let (_, pipeline) = submit_pipeline(store, jobs);
    let response = pipeline
        .handle(&harvest_event(SOURCE, "show/2_2/main.m3u8"), "req-1")
        .await
        .unwrap();

    assert_eq!(response.status_code, 201);
    assert_eq!(response.job_id, Some(JobId::from_string("job-parts")));
}

#[tokio::test]
async fn test_out_of_range_part_does_not_fill_gap() {
    let store = FakeStore::new()
        .with_object(SOURCE, "show/0_2/main.m3u8", b"#EXTM3U\n")
        .with_object(SOURCE, "show/2_2/main.m3u8", b"#EXTM3U\n");

    let mut jobs = MockJobs::new();
    jobs.expect_create_job().never();

    let (_, pipeline) = submit_pipeline(store, jobs);
    let response = pipeline
        .handle(&harvest_event(SOURCE, "show/2_2/main.m3u8"), "req-1")
        .await
        .unwrap();

    assert_eq!(response.status_code, 202);
}
