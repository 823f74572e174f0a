//! showrss API library
//!
//! Hosts the HTTP boundary and the episode pipeline in one process. This
//! module exposes the components for use in integration tests.

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod shutdown;

// Re-export commonly used types
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::{app_router, AppState};
pub use services::HealthService;
pub use shutdown::{ShutdownOrchestrator, ShutdownReport, ShutdownState};
