//! Health check service for the database and the hosted pipeline

use std::time::{Duration, Instant};

use serde::Serialize;
use showrss_worker::{PipelineMonitor, RefreshTrigger};
use sqlx::PgPool;

/// Upper bound for a single dependency check
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Status of an individual service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Service is healthy and responding
    Healthy,
    /// Service is unhealthy or unreachable
    Unhealthy,
}

/// Result of a single service health check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Name of the service
    pub name: &'static str,
    /// Current status
    pub status: ServiceStatus,
    /// Response time in milliseconds (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional details about the service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceHealth {
    /// Create a healthy service result
    pub fn healthy(name: &'static str, response_time: Duration) -> Self {
        Self {
            name,
            status: ServiceStatus::Healthy,
            response_time_ms: Some(response_time.as_millis() as u64),
            error: None,
            details: None,
        }
    }

    /// Create an unhealthy service result
    pub fn unhealthy(name: &'static str, error: impl Into<String>) -> Self {
        Self {
            name,
            status: ServiceStatus::Unhealthy,
            response_time_ms: None,
            error: Some(error.into()),
            details: None,
        }
    }

    /// Attach details to this result
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Aggregated health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Overall status (healthy only if all services are healthy)
    pub status: ServiceStatus,
    /// Individual service health results
    pub services: Vec<ServiceHealth>,
    /// Total time to complete all health checks
    pub total_time_ms: u64,
    /// API version
    pub version: &'static str,
}

impl HealthCheckResponse {
    /// Create a new health check response from individual service results
    pub fn new(services: Vec<ServiceHealth>, total_time: Duration) -> Self {
        let status = if services.iter().all(|s| s.status == ServiceStatus::Healthy) {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Unhealthy
        };

        Self {
            status,
            services,
            total_time_ms: total_time.as_millis() as u64,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Check if overall health is good
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// Health checks for everything the API depends on
#[derive(Debug, Clone)]
pub struct HealthService {
    pool: PgPool,
    trigger: RefreshTrigger,
    monitor: PipelineMonitor,
}

impl HealthService {
    pub fn new(pool: PgPool, trigger: RefreshTrigger, monitor: PipelineMonitor) -> Self {
        Self {
            pool,
            trigger,
            monitor,
        }
    }

    /// Check PostgreSQL connectivity with `SELECT 1`
    pub async fn check_database(&self) -> ServiceHealth {
        let start = Instant::now();

        let query = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool);
        match tokio::time::timeout(CHECK_TIMEOUT, query).await {
            Ok(Ok(_)) => ServiceHealth::healthy("database", start.elapsed()),
            Ok(Err(e)) => ServiceHealth::unhealthy("database", format!("Query failed: {}", e)),
            Err(_) => ServiceHealth::unhealthy(
                "database",
                format!("No response within {}s", CHECK_TIMEOUT.as_secs()),
            ),
        }
    }

    /// Report queue depths; unhealthy once the refresh stage stopped
    pub fn check_pipeline(&self) -> ServiceHealth {
        let start = Instant::now();
        let stats = self.monitor.snapshot();
        let details = serde_json::to_value(stats).unwrap_or(serde_json::Value::Null);

        let health = if self.trigger.is_closed() {
            ServiceHealth::unhealthy("pipeline", "refresh stage is not running")
        } else {
            ServiceHealth::healthy("pipeline", start.elapsed())
        };

        health.with_details(details)
    }

    /// Run all health checks
    pub async fn check_all(&self) -> HealthCheckResponse {
        let start = Instant::now();

        let database = self.check_database().await;
        let pipeline = self.check_pipeline();

        HealthCheckResponse::new(vec![database, pipeline], start.elapsed())
    }
}
