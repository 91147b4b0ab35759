use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use thiserror::Error;

static UNKNOWN_OPTIONS_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)unknown parameter.*(options|avoid_features)")
        .expect("static regex is valid")
});

#[derive(Error, Debug)]
pub enum AppError {
    #[error("LLM API error: {0}")]
    LlmApi(String),

    #[error("Routing API error (status {status:?}): {message}")]
    RoutingApi {
        status: Option<u16>,
        message: String,
    },

    #[error("Waypoint generation failed: {0}")]
    SeedGeneration(String),

    #[error("Waypoint validation failed: {0}")]
    SeedValidation(String),

    #[error("Snap failed: {0}")]
    Snap(String),

    #[error("Route shaping failed: {0}")]
    Shaping(String),

    #[error("Unable to generate a realistic route after {attempts} attempts")]
    ExhaustedAttempts { attempts: usize },

    #[error("Route planning was cancelled")]
    Cancelled,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stage failures the planner absorbs by starting over with a fresh seed.
    /// Only cancellation and exhaustion end planning.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            AppError::Cancelled | AppError::ExhaustedAttempts { .. }
        )
    }

    /// True when the directions backend rejected the optional `options` block.
    pub fn is_unknown_parameter(&self) -> bool {
        match self {
            AppError::RoutingApi {
                status: Some(400),
                message,
            } => UNKNOWN_OPTIONS_PARAMETER.is_match(message),
            _ => false,
        }
    }
}

// Convert AppError into HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidRequest(ref e) => (StatusCode::BAD_REQUEST, e.clone()),
            AppError::ExhaustedAttempts { attempts } => {
                tracing::warn!(attempts, "Trip planning exhausted all attempts");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not plan a route for this location. Please try again.".to_string(),
                )
            }
            AppError::Cancelled => {
                tracing::info!("Trip planning cancelled");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Route planning was cancelled".to_string(),
                )
            }
            AppError::LlmApi(ref e) => {
                tracing::error!("LLM API error: {}", e);
                (StatusCode::BAD_GATEWAY, "Waypoint service error".to_string())
            }
            AppError::RoutingApi { ref message, .. } => {
                tracing::error!("Routing API error: {}", message);
                (StatusCode::BAD_GATEWAY, "Routing service error".to_string())
            }
            ref e @ (AppError::SeedGeneration(_)
            | AppError::SeedValidation(_)
            | AppError::Snap(_)
            | AppError::Shaping(_)) => {
                tracing::warn!("Trip planning stage failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to plan trip".to_string(),
                )
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": status.canonical_reason().unwrap_or("Unknown error"),
            "message": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
