use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    missing_place_total: AtomicU64,
    unknown_place_total: AtomicU64,
    intent_fallback_total: AtomicU64,
    weather_failures_total: AtomicU64,
    empty_places_total: AtomicU64,
    nothing_fetched_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub missing_place_total: u64,
    pub unknown_place_total: u64,
    pub intent_fallback_total: u64,
    pub weather_failures_total: u64,
    pub empty_places_total: u64,
    pub nothing_fetched_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_missing_place(&self) {
        self.missing_place_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unknown_place(&self) {
        self.unknown_place_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_intent_fallback(&self) {
        self.intent_fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_weather_failure(&self) {
        self.weather_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_empty_places(&self) {
        self.empty_places_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_nothing_fetched(&self) {
        self.nothing_fetched_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            missing_place_total: self.missing_place_total.load(Ordering::Relaxed),
            unknown_place_total: self.unknown_place_total.load(Ordering::Relaxed),
            intent_fallback_total: self.intent_fallback_total.load(Ordering::Relaxed),
            weather_failures_total: self.weather_failures_total.load(Ordering::Relaxed),
            empty_places_total: self.empty_places_total.load(Ordering::Relaxed),
            nothing_fetched_total: self.nothing_fetched_total.load(Ordering::Relaxed),
            avg_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,guide_api=info,guide_agents=info,guide_providers=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}

/// Same JSON layout as [`init_tracing`], but on stderr and quiet by default
/// so command output on stdout stays clean.
pub fn init_cli_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("warn,{}=info", service_name)));

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}
