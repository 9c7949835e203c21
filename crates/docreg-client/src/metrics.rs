//! Prometheus metrics for the rate-limited submitter
//!
//! Counters and gauges describing how the admission gate behaves: how many
//! submissions were admitted, how long callers waited, how submissions ended
//! and how often the window was reset.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Outcome label for a submission that got a response (any status).
pub const OUTCOME_SUCCESS: &str = "success";
/// Outcome label for a payload that could not be serialized.
pub const OUTCOME_SERIALIZATION_ERROR: &str = "serialization_error";
/// Outcome label for a request that failed in the transport.
pub const OUTCOME_TRANSPORT_ERROR: &str = "transport_error";

/// Metrics registry holding all submitter metrics.
pub struct SubmitterMetrics {
    registry: Registry,
    /// Counter: admissions granted
    pub admissions_total: IntCounter,
    /// Counter: finished submissions by outcome
    pub submissions_total: IntCounterVec,
    /// Counter: window resets performed by the schedule
    pub window_resets_total: IntCounter,
    /// Gauge: admissions counted against the current window
    pub admission_count: IntGauge,
    /// Histogram: time spent waiting for admission, in seconds
    pub admission_wait_seconds: Histogram,
}

impl std::fmt::Debug for SubmitterMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmitterMetrics")
            .field("admissions_total", &self.admissions_total.get())
            .field("window_resets_total", &self.window_resets_total.get())
            .field("admission_count", &self.admission_count.get())
            .finish()
    }
}

impl SubmitterMetrics {
    /// Creates a new `SubmitterMetrics` with all metrics registered.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new_custom(Some("docreg".to_string()), None)?;

        let admissions_total = IntCounter::with_opts(Opts::new(
            "admissions_total",
            "Total submissions admitted by the rate limiter",
        ))?;
        registry.register(Box::new(admissions_total.clone()))?;

        let submissions_total = IntCounterVec::new(
            Opts::new("submissions_total", "Finished submissions by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(submissions_total.clone()))?;

        let window_resets_total = IntCounter::with_opts(Opts::new(
            "window_resets_total",
            "Total admission window resets",
        ))?;
        registry.register(Box::new(window_resets_total.clone()))?;

        let admission_count = IntGauge::with_opts(Opts::new(
            "admission_count",
            "Admissions counted against the current window",
        ))?;
        registry.register(Box::new(admission_count.clone()))?;

        let admission_wait_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "admission_wait_seconds",
                "Time spent waiting for an admission slot in seconds",
            )
            .buckets(vec![0.001, 0.01, 0.1, 1.0, 10.0, 60.0, f64::INFINITY]),
        )?;
        registry.register(Box::new(admission_wait_seconds.clone()))?;

        Ok(Self {
            registry,
            admissions_total,
            submissions_total,
            window_resets_total,
            admission_count,
            admission_wait_seconds,
        })
    }

    // ========================================================================
    // Recording helpers
    // ========================================================================

    /// Record a granted admission and how long the caller waited for it.
    pub fn record_admission(&self, wait_secs: f64) {
        self.admissions_total.inc();
        self.admission_wait_seconds.observe(wait_secs);
    }

    /// Record how a submission ended.
    pub fn record_outcome(&self, outcome: &str) {
        self.submissions_total.with_label_values(&[outcome]).inc();
    }

    /// Record a window reset.
    pub fn record_reset(&self) {
        self.window_resets_total.inc();
    }

    /// Set the admission count gauge.
    pub fn set_admission_count(&self, count: u32) {
        self.admission_count.set(i64::from(count));
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Encode all metrics in Prometheus text exposition format.
    pub fn encode(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
