use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Report configured collaborators and planner limits
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let planner = state.trip_planner.config();

    let mut status = json!({
        "status": "ok",
        "checks": {
            "llm_model": state.llm_model,
            "routing_service": state.routing_base_url,
            "presets": planner.use_presets,
            "max_attempts": planner.max_attempts,
            "cycling_max_km_per_day": planner.cycling_max_km_per_day,
            "hiking_km": [planner.hiking_min_km, planner.hiking_max_km],
        }
    });

    if state.shutdown.is_cancelled() {
        status["status"] = json!("shutting_down");
    }

    Json(status)
}
