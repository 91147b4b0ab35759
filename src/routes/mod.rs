pub mod debug;
pub mod trip;

use axum::{routing::{get, post}, Router};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/trips/plan", post(trip::plan_trip))
        .route("/debug/health", get(debug::health_check))
        .with_state(state)
}
