use crate::error::{AppError, Result};
use crate::models::trip::{PlanTripRequest, PlanTripResponse};
use crate::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;

/// POST /trips/plan
/// Plan a hiking loop or a two-day cycling trip around a location
pub async fn plan_trip(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanTripRequest>,
) -> Result<Json<PlanTripResponse>> {
    let location = request.location().map_err(AppError::InvalidRequest)?;
    let trip_type = request.trip_type().map_err(AppError::InvalidRequest)?;

    tracing::info!(
        location = %location.name,
        lat = location.coordinates.lat,
        lng = location.coordinates.lng,
        trip_type = %trip_type,
        "Trip plan request: {} ({:.4}, {:.4}), {}",
        location.name, location.coordinates.lat, location.coordinates.lng, trip_type
    );

    let route = state
        .trip_planner
        .plan_route_with_cancel(&location.name, trip_type, &state.shutdown)
        .await?;

    Ok(Json(PlanTripResponse::new(route)))
}
