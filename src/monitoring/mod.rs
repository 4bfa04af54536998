use crate::{error::UploadError, processing::UploadReport, storage::ContainerState};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub const REQUESTS_TOTAL: &str = "requests_total";
pub const UPLOADS_OK: &str = "uploads_ok";
pub const BAD_REQUESTS: &str = "bad_requests";
pub const SERVER_ERRORS: &str = "server_errors";
pub const PHOTOS_WRITTEN: &str = "photos_written";
pub const PHOTOS_FAILED: &str = "photos_failed";
pub const CONTAINERS_CREATED: &str = "containers_created";

/// Install the global fmt subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Request outcome counters.
#[derive(Clone, Default)]
pub struct UploadMetrics {
    counters: Arc<RwLock<BTreeMap<&'static str, u64>>>,
}

impl UploadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn increment(&self, name: &'static str, by: u64) {
        if by == 0 {
            return;
        }
        let mut counters = self.counters.write().await;
        *counters.entry(name).or_insert(0) += by;
    }

    pub async fn record_outcome(&self, outcome: &Result<UploadReport, UploadError>) {
        self.increment(REQUESTS_TOTAL, 1).await;

        match outcome {
            Ok(report) => {
                self.increment(UPLOADS_OK, 1).await;
                self.increment(PHOTOS_WRITTEN, report.written() as u64).await;
                self.increment(PHOTOS_FAILED, report.failed() as u64).await;
                if report.container_state == ContainerState::Created {
                    self.increment(CONTAINERS_CREATED, 1).await;
                }
            }
            Err(e) if e.is_client_error() => self.increment(BAD_REQUESTS, 1).await,
            Err(_) => self.increment(SERVER_ERRORS, 1).await,
        }
    }

    pub async fn get(&self, name: &str) -> u64 {
        self.counters.read().await.get(name).copied().unwrap_or(0)
    }

    pub async fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counters
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub counters: BTreeMap<String, u64>,
}

#[derive(Clone)]
pub struct HealthMonitor {
    start_time: Instant,
    metrics: UploadMetrics,
}

impl HealthMonitor {
    pub fn new(metrics: UploadMetrics) -> Self {
        info!("Health monitor started");
        HealthMonitor {
            start_time: Instant::now(),
            metrics,
        }
    }

    pub async fn get_health_status(&self) -> HealthStatus {
        HealthStatus {
            status: "ok",
            uptime_seconds: self.start_time.elapsed().as_secs(),
            counters: self.metrics.snapshot().await,
        }
    }
}
