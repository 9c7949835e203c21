//! Shared helpers for registration API integration tests

use std::{sync::Arc, time::Duration};

use docreg_client::{RateLimitedSubmitter, ReqwestTransport};
use docreg_core::domain::{Description, Document, Product, Quota, WindowUnit};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the registration endpoint is mounted on.
pub const CREATE_PATH: &str = "/api/v3/lk/documents/create";

/// Starts a mock server whose create endpoint answers with `status` and `body`.
pub async fn setup_registry_mock(status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CREATE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(&server)
        .await;

    server
}

/// Builds a submitter pointed at the mock server's create endpoint.
pub fn submitter_for(server: &MockServer, quota: Quota) -> RateLimitedSubmitter {
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(5))
        .expect("transport should build");
    RateLimitedSubmitter::builder(quota, Arc::new(transport))
        .endpoint(format!("{}{}", server.uri(), CREATE_PATH))
        .build()
}

pub fn quota(unit: WindowUnit, count: u32, max_admissions: u32) -> Quota {
    Quota::per_unit(unit, count, max_admissions).expect("valid quota")
}

/// An introduction document with one product.
pub fn introduce_goods_document() -> Document {
    Document {
        description: Some(Description {
            participant_inn: Some("7700000000".to_string()),
        }),
        doc_id: Some("doc-42".to_string()),
        doc_status: Some("NEW".to_string()),
        doc_type: Some("LP_INTRODUCE_GOODS".to_string()),
        import_request: false,
        owner_inn: Some("7700000000".to_string()),
        participant_inn: Some("7700000000".to_string()),
        producer_inn: Some("7700000001".to_string()),
        production_date: Some("2024-03-01".to_string()),
        production_type: Some("OWN_PRODUCTION".to_string()),
        products: vec![Product {
            certificate_document: Some("CONFORMITY_CERTIFICATE".to_string()),
            certificate_document_date: Some("2024-02-01".to_string()),
            certificate_document_number: Some("RU-0001".to_string()),
            owner_inn: Some("7700000000".to_string()),
            producer_inn: Some("7700000001".to_string()),
            production_date: Some("2024-03-01".to_string()),
            tnved_code: Some("6401100000".to_string()),
            uit_code: Some("010461111111111121abcdef".to_string()),
            uitu_code: None,
        }],
        reg_date: Some("2024-03-02".to_string()),
        reg_number: None,
    }
}
