//! Integration tests for admission gating against a live HTTP server
//!
//! The mock server delays every response so that admitted submissions stay
//! in flight long enough for the quota to matter.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use docreg_client::SubmitError;
use docreg_core::domain::WindowUnit;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common;

async fn setup_slow_registry(delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(delay))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_third_submission_waits_for_a_completion() {
    let server = setup_slow_registry(Duration::from_millis(300)).await;
    let submitter = Arc::new(common::submitter_for(
        &server,
        common::quota(WindowUnit::Minutes, 1, 2),
    ));

    let started = Instant::now();
    let handles: Vec<_> = (0..3)
        .map(|_| {
            let submitter = Arc::clone(&submitter);
            tokio::spawn(async move {
                submitter
                    .create_document(&common::introduce_goods_document(), "sig")
                    .await
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap().expect("submission failed");
        assert_eq!(response.status, 200);
    }
    let elapsed = started.elapsed();

    // Two run side by side; the third can only start after one of them ends
    assert!(
        elapsed >= Duration::from_millis(550),
        "finished too fast for a limit of two: {elapsed:?}"
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    assert_eq!(submitter.admission_count(), 0);
}

#[tokio::test]
async fn test_window_reset_admits_before_completion() {
    let server = setup_slow_registry(Duration::from_millis(1_000)).await;
    let submitter = Arc::new(common::submitter_for(
        &server,
        common::quota(WindowUnit::Milliseconds, 200, 1),
    ));

    let started = Instant::now();
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let submitter = Arc::clone(&submitter);
            tokio::spawn(async move {
                submitter
                    .create_document(&common::introduce_goods_document(), "sig")
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().expect("submission failed");
    }
    let elapsed = started.elapsed();

    // The second request starts at the first reset, not after the first response
    assert!(
        elapsed < Duration::from_millis(1_900),
        "second submission waited for the first to complete: {elapsed:?}"
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_shutdown_fails_waiting_submission() {
    let server = setup_slow_registry(Duration::from_millis(500)).await;
    let submitter = Arc::new(common::submitter_for(
        &server,
        common::quota(WindowUnit::Minutes, 1, 1),
    ));

    let spawn = |submitter: &Arc<docreg_client::RateLimitedSubmitter>| {
        let submitter = Arc::clone(submitter);
        tokio::spawn(async move {
            submitter
                .create_document(&common::introduce_goods_document(), "sig")
                .await
        })
    };

    let in_flight = spawn(&submitter);
    tokio::time::sleep(Duration::from_millis(100)).await;
    let waiting = spawn(&submitter);
    tokio::time::sleep(Duration::from_millis(50)).await;

    submitter.shutdown();

    let err = waiting.await.unwrap().unwrap_err();
    assert!(matches!(err, SubmitError::InterruptedWait), "got {err:?}");

    let response = in_flight.await.unwrap().expect("in-flight call completes");
    assert_eq!(response.status, 200);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
