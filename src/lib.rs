// Library exports for testing and reusability

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use error::{AppError, Result};

use services::trip_planner::TripPlanner;
use tokio_util::sync::CancellationToken;

// App state for sharing across the application
pub struct AppState {
    pub trip_planner: TripPlanner,
    /// Cancelled on server shutdown; aborts in-flight planning requests
    pub shutdown: CancellationToken,
    /// LLM model name, reported by the health check
    pub llm_model: String,
    /// Routing service base URL, reported by the health check
    pub routing_base_url: String,
}
