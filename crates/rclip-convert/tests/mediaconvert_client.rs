//! MediaConvert client tests against a mocked service endpoint.

use rclip_convert::{ConvertError, JobService, MediaConvertClient};
use rclip_models::{HarvestJobEvent, JobId, TranscodeJobSpec};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROLE: &str = "arn:aws:iam::123456789012:role/convert";
const CREATE_JOB_PATH: &str = "/2017-08-29/jobs";

fn client_for(endpoint: &str) -> MediaConvertClient {
    MediaConvertClient::with_static_credentials(endpoint, "us-east-1", "test-access", "test-secret")
}

fn spec() -> TranscodeJobSpec {
    let event = HarvestJobEvent::new("src", "a/b/manifest.hls").unwrap();
    TranscodeJobSpec::for_harvest(&event, "dst")
}

#[tokio::test]
async fn test_accepted_job_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_JOB_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "job": {
                "id": "1700000000000-abc123",
                "role": ROLE,
                "settings": {}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client_for(&server.uri()).create_job(ROLE, &spec()).await.unwrap();

    assert!(reply.is_success());
    assert_eq!(reply.status_code, 201);
    assert_eq!(reply.job_id, Some(JobId::from_string("1700000000000-abc123")));
}

#[tokio::test]
async fn test_request_carries_role_and_destination() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_JOB_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "job": { "id": "j-1", "role": ROLE, "settings": {} }
        })))
        .mount(&server)
        .await;

    client_for(&server.uri()).create_job(ROLE, &spec()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["role"], ROLE);
    assert_eq!(
        body["settings"]["outputGroups"][0]["outputGroupSettings"]["fileGroupSettings"]
            ["destination"],
        "s3://dst/a/b/"
    );
    assert_eq!(body["settings"]["inputs"][0]["fileInput"], "s3://src/a/b/manifest.hls");
}

#[tokio::test]
async fn test_service_error_becomes_rejected_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_JOB_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-amzn-ErrorType", "ForbiddenException")
                .set_body_json(json!({ "message": "role not assumable" })),
        )
        .mount(&server)
        .await;

    let reply = client_for(&server.uri()).create_job(ROLE, &spec()).await.unwrap();

    assert!(!reply.is_success());
    assert_eq!(reply.status_code, 403);
    assert_eq!(reply.job_id, None);
    assert_eq!(
        reply.message.as_deref(),
        Some("ForbiddenException: role not assumable")
    );
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Bind then release a port so nothing listens on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client_for(&endpoint).create_job(ROLE, &spec()).await.unwrap_err();

    assert!(matches!(err, ConvertError::Transport(_)));
}
