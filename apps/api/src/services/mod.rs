//! Business logic behind the HTTP handlers

pub mod health;

pub use health::{HealthCheckResponse, HealthService, ServiceHealth, ServiceStatus};
