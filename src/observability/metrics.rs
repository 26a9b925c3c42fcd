use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

/// Metrics if already initialized, for callers that cannot await.
pub fn try_get_metrics() -> Option<&'static Arc<Metrics>> {
    METRICS_INSTANCE.get()
}

pub const OUTCOME_HIT: &str = "hit";
pub const OUTCOME_JOINED: &str = "joined";
pub const OUTCOME_REFRESH: &str = "refresh";

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token cache metrics
    pub token_requests: IntCounterVec,
    pub token_refresh_failures: IntCounterVec,
    pub token_refresh_duration: Histogram,
    pub token_expiry_unix: IntGauge,
    pub token_invalidations: IntCounter,

    // Content proxy metrics
    pub content_requests: IntCounterVec,
    pub content_duration: HistogramVec,

    // Config/runtime
    pub parse_failures: IntCounter,
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("quran_gateway".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token cache
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "Token lookups by outcome (hit, joined, refresh)"), &["outcome"]).unwrap(),
            token_refresh_failures: IntCounterVec::new(Opts::new("token_refresh_failures_total", "Failed token refreshes by kind"), &["kind"]).unwrap(),
            token_refresh_duration: Histogram::with_opts(HistogramOpts::new("token_refresh_duration_seconds", "Token refresh duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0])).unwrap(),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Expiry timestamp of the current token").unwrap(),
            token_invalidations: IntCounter::new("token_invalidations_total", "Explicit token cache invalidations").unwrap(),

            // Content
            content_requests: IntCounterVec::new(Opts::new("content_requests_total", "Upstream content requests by resource and status class"), &["resource", "status"]).unwrap(),
            content_duration: HistogramVec::new(HistogramOpts::new("content_request_duration_seconds", "Upstream content request duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["resource"]).unwrap(),

            // Config/runtime
            parse_failures: IntCounter::new("config_parse_failures_total", "Config file parse failures").unwrap(),
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone())).unwrap();
        reg.register(Box::new(metrics.token_refresh_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_refresh_duration.clone())).unwrap();
        reg.register(Box::new(metrics.token_expiry_unix.clone())).unwrap();
        reg.register(Box::new(metrics.token_invalidations.clone())).unwrap();
        reg.register(Box::new(metrics.content_requests.clone())).unwrap();
        reg.register(Box::new(metrics.content_duration.clone())).unwrap();
        reg.register(Box::new(metrics.parse_failures.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
