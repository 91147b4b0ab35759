use crate::config::PlannerConfig;
use crate::error::{AppError, Result};
use crate::models::{TripType, Waypoint};
use crate::services::geometry::{haversine_distance, LngLat};
use crate::services::routing::RoutingBackend;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Moves validated waypoints onto the routable network, widening the search
/// radius until enough distinct points come back.
#[derive(Clone)]
pub struct NetworkSnapper {
    backend: Arc<dyn RoutingBackend>,
    config: PlannerConfig,
}

impl NetworkSnapper {
    pub fn new(backend: Arc<dyn RoutingBackend>, config: PlannerConfig) -> Self {
        NetworkSnapper { backend, config }
    }

    #[instrument(skip(self, waypoints), fields(count = waypoints.len()))]
    pub async fn snap(&self, waypoints: &[Waypoint], trip_type: TripType) -> Result<Vec<LngLat>> {
        let locations: Vec<LngLat> = waypoints.iter().map(Waypoint::to_lng_lat).collect();
        let needed = self.config.min_snapped_points;
        let mut best = 0usize;

        for &radius in &self.config.snap_radii_m {
            let raw = match self.backend.snap(trip_type, &locations, radius).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(
                        radius_m = radius,
                        error = %e,
                        "Snap call failed at {}m: {}",
                        radius, e
                    );
                    continue;
                }
            };

            let snapped = dedup_points(usable_points(raw), self.config.dedup_distance_m);
            best = best.max(snapped.len());

            if snapped.len() >= needed {
                debug!(
                    radius_m = radius,
                    snapped = snapped.len(),
                    "Snapped {}/{} waypoints at {}m",
                    snapped.len(), locations.len(), radius
                );
                return Ok(snapped);
            }

            tracing::info!(
                radius_m = radius,
                snapped = snapped.len(),
                "Only {} usable points at {}m (need {}), widening radius",
                snapped.len(), radius, needed
            );
        }

        Err(AppError::Snap(format!(
            "at most {} usable points across radii {:?}, need {}",
            best, self.config.snap_radii_m, needed
        )))
    }
}

/// Drop null entries and anything that is not a finite `[lng, lat]` pair
fn usable_points(raw: Vec<Option<Vec<f64>>>) -> Vec<LngLat> {
    raw.into_iter()
        .flatten()
        .filter(|p| p.len() == 2 && p.iter().all(|v| v.is_finite()))
        .map(|p| [p[0], p[1]])
        .collect()
}

/// Greedy, order-preserving: a point is kept unless it lies within
/// `min_distance_m` of one already kept.
fn dedup_points(points: Vec<LngLat>, min_distance_m: f64) -> Vec<LngLat> {
    let mut kept: Vec<LngLat> = Vec::with_capacity(points.len());
    for point in points {
        if kept
            .iter()
            .all(|k| haversine_distance(*k, point) >= min_distance_m)
        {
            kept.push(point);
        }
    }
    kept
}
