use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};
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

// Outcome labels for token_requests
pub static OUTCOME_CACHE_HIT: &str = "cache_hit";
pub static OUTCOME_REFRESHED: &str = "refreshed";
pub static OUTCOME_ERROR: &str = "error";

// Reason labels for provider_failures
pub static REASON_PROVIDER: &str = "provider";
pub static REASON_TRANSPORT: &str = "transport";
pub static REASON_DECODE: &str = "decode";

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token negotiation
    pub token_requests: IntCounterVec,
    pub provider_requests: IntCounter,
    pub provider_failures: IntCounterVec,

    // Cache
    pub cache_write_failures: IntCounter,
    pub token_expiry_unix: IntGauge,

    // Endpoint
    pub unauthorized_requests: IntCounter,

    // Config/runtime
    pub config_parse_failures: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("apptoken".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "Token requests by outcome"), &["outcome"]).unwrap(),
            provider_requests: IntCounter::new("provider_requests_total", "Token endpoint calls").unwrap(),
            provider_failures: IntCounterVec::new(Opts::new("provider_failures_total", "Token endpoint failures by reason"), &["reason"]).unwrap(),

            cache_write_failures: IntCounter::new("cache_write_failures_total", "Failed token cache writes").unwrap(),
            token_expiry_unix: IntGauge::new("token_expiry_unix_millis", "Expiry timestamp of the cached token").unwrap(),

            unauthorized_requests: IntCounter::new("unauthorized_requests_total", "Requests rejected by the nonce check").unwrap(),

            config_parse_failures: IntCounter::new("config_parse_failures_total", "Config parse errors during startup").unwrap(),
            up: IntGauge::new("up", "1 if service is healthy").unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone())).unwrap();
        reg.register(Box::new(metrics.provider_requests.clone())).unwrap();
        reg.register(Box::new(metrics.provider_failures.clone())).unwrap();
        reg.register(Box::new(metrics.cache_write_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_expiry_unix.clone())).unwrap();
        reg.register(Box::new(metrics.unauthorized_requests.clone())).unwrap();
        reg.register(Box::new(metrics.config_parse_failures.clone())).unwrap();
        reg.register(Box::new(metrics.up.clone())).unwrap();

        metrics
    }
}
