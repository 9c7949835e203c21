//! reqwest-backed registration transport
//!
//! Implements [`IRegistrationTransport`] on top of a single shared
//! `reqwest::Client`, so connection pooling and keep-alive are handled by
//! reqwest. The response status and body are returned verbatim.

use std::time::Duration;

use async_trait::async_trait;
use docreg_core::{
    domain::SubmissionResponse,
    ports::{IRegistrationTransport, OutboundRequest, TransportError},
};
use reqwest::Client;
use tracing::{debug, warn};

/// HTTP transport for the registration API
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with reqwest's default client settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport whose requests are abandoned after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self { client })
    }

    /// Wraps an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IRegistrationTransport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<SubmissionResponse, TransportError> {
        let OutboundRequest {
            endpoint,
            headers,
            body,
        } = request;

        let mut builder = self.client.post(&endpoint).body(body);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            warn!(endpoint = %endpoint, error = %e, "Registration request failed");
            map_reqwest_error(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        debug!(endpoint = %endpoint, status, bytes = body.len(), "Registration response received");

        Ok(SubmissionResponse { status, body })
    }
}

/// Classifies a reqwest error into the port's error kinds
fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    let message = e.to_string();
    if e.is_timeout() {
        TransportError::Timeout(message)
    } else if e.is_connect() {
        TransportError::Connect(message)
    } else if e.is_builder() {
        TransportError::InvalidRequest(message)
    } else if e.is_body() || e.is_decode() {
        TransportError::Body(message)
    } else {
        TransportError::Other(message)
    }
}
