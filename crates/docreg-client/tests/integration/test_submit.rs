//! Integration tests for the wire shape of a submission
//!
//! Verifies that RateLimitedSubmitter::create_document() sends a POST with
//! the JSON body and both headers, and that any status code comes back to
//! the caller unchanged.

use std::{sync::Arc, time::Duration};

use docreg_client::{RateLimitedSubmitter, ReqwestTransport, SubmitError};
use docreg_core::{domain::WindowUnit, ports::TransportError};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

#[tokio::test]
async fn test_create_document_posts_json_with_signature() {
    let server = MockServer::start().await;
    let document = common::introduce_goods_document();
    let expected_body = serde_json::to_value(&document).unwrap();

    Mock::given(method("POST"))
        .and(path(common::CREATE_PATH))
        .and(header("Content-Type", "application/json"))
        .and(header("Signature", "detached-signature"))
        .and(body_json(expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"value":"doc-42"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = common::submitter_for(&server, common::quota(WindowUnit::Seconds, 1, 5));
    let response = submitter
        .create_document(&document, "detached-signature")
        .await
        .expect("create_document failed");

    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{"value":"doc-42"}"#);
    assert!(response.is_success());
}

#[tokio::test]
async fn test_body_uses_wire_field_names() {
    let server = common::setup_registry_mock(200, "").await;
    let submitter = common::submitter_for(&server, common::quota(WindowUnit::Seconds, 1, 5));

    submitter
        .create_document(&common::introduce_goods_document(), "sig")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();

    assert_eq!(body["importRequest"], false);
    assert_eq!(body["description"]["participantInn"], "7700000000");
    assert_eq!(body["doc_type"], "LP_INTRODUCE_GOODS");
    assert_eq!(body["products"][0]["tnved_code"], "6401100000");
    assert!(body["reg_number"].is_null());
}

#[tokio::test]
async fn test_unauthorized_status_is_not_an_error() {
    let server = common::setup_registry_mock(401, "signature rejected").await;
    let submitter = common::submitter_for(&server, common::quota(WindowUnit::Seconds, 1, 1));

    let response = submitter
        .create_document(&common::introduce_goods_document(), "bad-signature")
        .await
        .expect("a 401 response is still a response");

    assert_eq!(response.status, 401);
    assert_eq!(response.body, "signature rejected");
    assert!(!response.is_success());
    assert_eq!(submitter.admission_count(), 0);
}

#[tokio::test]
async fn test_server_error_body_returned_verbatim() {
    let server = common::setup_registry_mock(503, "<html>maintenance</html>").await;
    let submitter = common::submitter_for(&server, common::quota(WindowUnit::Seconds, 1, 1));

    let response = submitter
        .create_document(&common::introduce_goods_document(), "sig")
        .await
        .unwrap();

    assert_eq!(response.status, 503);
    assert_eq!(response.body, "<html>maintenance</html>");
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = ReqwestTransport::with_timeout(Duration::from_secs(5)).unwrap();
    let submitter = RateLimitedSubmitter::builder(
        common::quota(WindowUnit::Seconds, 1, 1),
        Arc::new(transport),
    )
    .endpoint(format!("http://{addr}{}", common::CREATE_PATH))
    .build();

    let err = submitter
        .create_document(&common::introduce_goods_document(), "sig")
        .await
        .unwrap_err();

    assert!(
        matches!(err, SubmitError::Transport(TransportError::Connect(_))),
        "unexpected error: {err:?}"
    );
    assert_eq!(submitter.admission_count(), 0);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::with_timeout(Duration::from_millis(200)).unwrap();
    let submitter = RateLimitedSubmitter::builder(
        common::quota(WindowUnit::Seconds, 1, 1),
        Arc::new(transport),
    )
    .endpoint(format!("{}{}", server.uri(), common::CREATE_PATH))
    .build();

    let err = submitter
        .create_document(&common::introduce_goods_document(), "sig")
        .await
        .unwrap_err();

    assert!(
        matches!(err, SubmitError::Transport(TransportError::Timeout(_))),
        "unexpected error: {err:?}"
    );
    assert_eq!(submitter.admission_count(), 0);
}
