//! Rate-limited document submitter
//!
//! [`RateLimitedSubmitter`] admits at most `max_admissions` submissions per
//! quota window and performs the registration call for each admitted one.
//!
//! ## Lifecycle of a submission
//!
//! ```text
//! PENDING_ADMISSION ──► ADMITTED ──► IN_FLIGHT ──► COMPLETED
//!   (waits on the        (slot        (HTTP call      (slot released,
//!    window counter)      taken)       outside lock)   waiters woken)
//! ```
//!
//! A slot is freed either when its submission completes or when the periodic
//! reset zeroes the window, whichever comes first. A reset therefore forgives
//! submissions that are still in flight, and across a reset boundary more than
//! `max_admissions` requests can be outstanding at once.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use docreg_client::{ReqwestTransport, RateLimitedSubmitter};
//! use docreg_core::domain::{Document, Quota, SubmissionRequest, WindowUnit};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let quota = Quota::per_unit(WindowUnit::Minutes, 1, 5)?;
//! let submitter = RateLimitedSubmitter::builder(quota, Arc::new(ReqwestTransport::new())).build();
//!
//! let response = submitter
//!     .submit(SubmissionRequest::new(Document::default(), "signature"))
//!     .await?;
//! println!("{} {}", response.status, response.body);
//! # Ok(())
//! # }
//! ```

use std::{sync::Arc, time::Duration};

use docreg_core::{
    config::{Config, DEFAULT_ENDPOINT},
    domain::{Document, Quota, SubmissionRequest, SubmissionResponse},
    ports::{
        IRegistrationTransport, OutboundRequest, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE,
        SIGNATURE_HEADER,
    },
};
use serde::Serialize;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    metrics::{
        SubmitterMetrics, OUTCOME_SERIALIZATION_ERROR, OUTCOME_SUCCESS, OUTCOME_TRANSPORT_ERROR,
    },
    transport::ReqwestTransport,
    window::WindowCounter,
    SubmitError,
};

// ============================================================================
// SubmitterBuilder
// ============================================================================

/// Builder for [`RateLimitedSubmitter`]
pub struct SubmitterBuilder {
    quota: Quota,
    transport: Arc<dyn IRegistrationTransport>,
    endpoint: String,
    metrics: Option<Arc<SubmitterMetrics>>,
}

impl SubmitterBuilder {
    /// Starts a builder from configuration, using a [`ReqwestTransport`]
    /// with the configured request timeout.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let quota = config.quota()?;
        let transport =
            ReqwestTransport::with_timeout(Duration::from_secs(config.api.request_timeout_secs))?;
        Ok(RateLimitedSubmitter::builder(quota, Arc::new(transport)).endpoint(&config.api.endpoint))
    }

    /// Sets the registration endpoint (defaults to [`DEFAULT_ENDPOINT`])
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Attaches a metrics registry
    pub fn metrics(mut self, metrics: Arc<SubmitterMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the submitter and starts its window reset schedule.
    ///
    /// The schedule is a Tokio task, so this must be called from within a
    /// Tokio runtime. The first reset happens one full window after this call.
    pub fn build(self) -> RateLimitedSubmitter {
        let counter = Arc::new(WindowCounter::new());
        let shutdown = CancellationToken::new();

        tokio::spawn(run_reset_schedule(
            Arc::clone(&counter),
            self.quota.window(),
            shutdown.clone(),
            self.metrics.clone(),
        ));

        info!(
            endpoint = %self.endpoint,
            window = ?self.quota.window(),
            max_admissions = self.quota.max_admissions(),
            "Rate-limited submitter started"
        );

        RateLimitedSubmitter {
            quota: self.quota,
            endpoint: self.endpoint,
            counter,
            transport: self.transport,
            metrics: self.metrics,
            shutdown,
        }
    }
}

// ============================================================================
// RateLimitedSubmitter
// ============================================================================

/// Submits documents while respecting a per-window admission quota
///
/// Admission is serialized through a shared [`WindowCounter`]; the network
/// calls of admitted submissions run concurrently. Designed to be shared via
/// `Arc<RateLimitedSubmitter>`.
pub struct RateLimitedSubmitter {
    quota: Quota,
    endpoint: String,
    counter: Arc<WindowCounter>,
    transport: Arc<dyn IRegistrationTransport>,
    metrics: Option<Arc<SubmitterMetrics>>,
    shutdown: CancellationToken,
}

impl std::fmt::Debug for RateLimitedSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitedSubmitter")
            .field("quota", &self.quota)
            .field("endpoint", &self.endpoint)
            .field("counter", &self.counter)
            .finish()
    }
}

impl RateLimitedSubmitter {
    /// Starts building a submitter for the given quota and transport
    pub fn builder(quota: Quota, transport: Arc<dyn IRegistrationTransport>) -> SubmitterBuilder {
        SubmitterBuilder {
            quota,
            transport,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            metrics: None,
        }
    }

    /// Builds a submitter from configuration with a [`ReqwestTransport`].
    ///
    /// Use [`SubmitterBuilder::from_config`] to attach metrics first.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(SubmitterBuilder::from_config(config)?.build())
    }

    /// The quota this submitter enforces
    pub fn quota(&self) -> Quota {
        self.quota
    }

    /// The registration endpoint requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Admissions currently counted against the window
    pub fn admission_count(&self) -> u32 {
        self.counter.count()
    }

    /// Submits a document to the registration API.
    ///
    /// Waits, without timeout, until the window has a free slot, then
    /// serializes the payload and POSTs it with `Content-Type` and `Signature`
    /// headers. The slot is released when this call finishes, fails, or is
    /// dropped mid-flight.
    ///
    /// Any HTTP status is returned as a [`SubmissionResponse`]; only
    /// serialization and transport failures are errors.
    ///
    /// # Errors
    /// - [`SubmitError::Serialization`] if the payload cannot be encoded
    /// - [`SubmitError::Transport`] if the request could not be delivered
    /// - [`SubmitError::InterruptedWait`] if [`shutdown`](Self::shutdown) is
    ///   called while this call waits for admission
    /// - [`SubmitError::Closed`] if the submitter was already shut down
    pub async fn submit<D>(
        &self,
        request: SubmissionRequest<D>,
    ) -> Result<SubmissionResponse, SubmitError>
    where
        D: Serialize,
    {
        let SubmissionRequest {
            document,
            signature,
        } = request;

        let permit = self.admit().await?;

        let body = match serde_json::to_string(&document) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Document could not be serialized");
                self.record_outcome(OUTCOME_SERIALIZATION_ERROR);
                return Err(SubmitError::Serialization(e));
            }
        };

        let outbound = OutboundRequest {
            endpoint: self.endpoint.clone(),
            headers: vec![
                (CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string()),
                (SIGNATURE_HEADER.to_string(), signature),
            ],
            body,
        };

        let result = self.transport.send(outbound).await;
        drop(permit);

        match result {
            Ok(response) => {
                debug!(status = response.status, "Document submitted");
                self.record_outcome(OUTCOME_SUCCESS);
                Ok(response)
            }
            Err(e) => {
                warn!(error = %e, "Document submission failed");
                self.record_outcome(OUTCOME_TRANSPORT_ERROR);
                Err(SubmitError::Transport(e))
            }
        }
    }

    /// Submits a [`Document`] with the given signature.
    pub async fn create_document(
        &self,
        document: &Document,
        signature: &str,
    ) -> Result<SubmissionResponse, SubmitError> {
        self.submit(SubmissionRequest::new(document, signature)).await
    }

    /// Stops the reset schedule and closes admission.
    ///
    /// Submissions already in flight finish normally. Callers waiting for
    /// admission fail with [`SubmitError::InterruptedWait`]; later calls fail
    /// with [`SubmitError::Closed`].
    pub fn shutdown(&self) {
        info!(
            outstanding = self.counter.count(),
            "Shutting down rate-limited submitter"
        );
        self.shutdown.cancel();
        self.counter.close();
    }

    /// Waits until the window has room and takes one slot.
    async fn admit(&self) -> Result<AdmissionPermit<'_>, SubmitError> {
        if self.counter.is_closed() {
            return Err(SubmitError::Closed);
        }

        let limit = self.quota.max_admissions();
        let started = Instant::now();
        let mut waited = false;

        loop {
            // Register for wakeups before checking so a change between the
            // check and the await is not missed.
            let changed = self.counter.changed();
            tokio::pin!(changed);
            changed.as_mut().enable();

            if self.counter.try_increment(limit) {
                let wait = started.elapsed();
                let count = self.counter.count();
                debug!(
                    count,
                    limit,
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "Admission granted"
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_admission(wait.as_secs_f64());
                    metrics.set_admission_count(count);
                }
                return Ok(AdmissionPermit { submitter: self });
            }

            if self.counter.is_closed() {
                return Err(if waited {
                    SubmitError::InterruptedWait
                } else {
                    SubmitError::Closed
                });
            }

            if !waited {
                debug!(limit, "Quota exhausted, waiting for admission");
                waited = true;
            }

            changed.await;
        }
    }

    fn release(&self) {
        let count = self.counter.decrement();
        debug!(count, "Admission released");
        if let Some(metrics) = &self.metrics {
            metrics.set_admission_count(count);
        }
    }

    fn record_outcome(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_outcome(outcome);
        }
    }
}

impl Drop for RateLimitedSubmitter {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// One admission slot; released on drop.
struct AdmissionPermit<'a> {
    submitter: &'a RateLimitedSubmitter,
}

impl Drop for AdmissionPermit<'_> {
    fn drop(&mut self) {
        self.submitter.release();
    }
}

// ============================================================================
// Window reset schedule
// ============================================================================

/// Zeroes the counter once per window until `shutdown` is cancelled.
async fn run_reset_schedule(
    counter: Arc<WindowCounter>,
    window: Duration,
    shutdown: CancellationToken,
    metrics: Option<Arc<SubmitterMetrics>>,
) {
    let Some(first_reset) = Instant::now().checked_add(window) else {
        error!(
            window = ?window,
            "Window is too long to schedule, admissions will never be reset"
        );
        return;
    };
    let mut ticker = tokio::time::interval_at(first_reset, window);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                debug!("Window reset schedule cancelled");
                break;
            }
            _ = ticker.tick() => {
                let discarded = counter.reset();
                if discarded > 0 {
                    debug!(discarded, "Window reset forgave in-flight admissions");
                }
                if let Some(metrics) = &metrics {
                    metrics.record_reset();
                    metrics.set_admission_count(0);
                }
            }
        }
    }
}
