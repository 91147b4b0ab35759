mod day_split;
mod strategy;

pub use day_split::{single_day, split_two_days};
pub use strategy::{strategies_for, CandidateInput, ShapingStrategy};

use crate::config::PlannerConfig;
use crate::error::{AppError, Result};
use crate::models::{RouteFeature, TripPlan, TripType};
use crate::services::geometry::{close_loop, LngLat};
use crate::services::routing::RoutingBackend;
use std::sync::Arc;
use tracing::instrument;

/// Turns snapped points into a routed, distance-checked trip.
#[derive(Clone)]
pub struct RouteShaper {
    backend: Arc<dyn RoutingBackend>,
    config: PlannerConfig,
}

impl RouteShaper {
    pub fn new(backend: Arc<dyn RoutingBackend>, config: PlannerConfig) -> Self {
        RouteShaper { backend, config }
    }

    /// One directions call. Backends that reject the optional avoid-features
    /// block get a single retry without it; other errors propagate.
    pub async fn build_route(
        &self,
        trip_type: TripType,
        coordinates: &[LngLat],
    ) -> Result<RouteFeature> {
        let directions = match self.backend.directions(trip_type, coordinates, true).await {
            Err(e) if e.is_unknown_parameter() => {
                tracing::warn!(
                    error = %e,
                    "Directions backend rejected options, retrying without them"
                );
                self.backend.directions(trip_type, coordinates, false).await?
            }
            other => other?,
        };

        Ok(RouteFeature::measure(directions.geometry, directions.summary))
    }

    /// Route the snapped points and bring the result within the trip's
    /// distance limits, falling back through coarser candidates as needed.
    #[instrument(skip(self, snapped), fields(points = snapped.len()))]
    pub async fn shape(&self, snapped: &[LngLat], trip_type: TripType) -> Result<TripPlan> {
        if snapped.len() < 2 {
            return Err(AppError::Shaping(format!(
                "{} snapped points, need at least 2",
                snapped.len()
            )));
        }

        let (initial, max_km, loop_close_m) = match trip_type {
            TripType::Hiking => (
                close_loop(snapped.to_vec(), self.config.loop_close_m),
                self.config.hiking_max_km,
                Some(self.config.loop_close_m),
            ),
            TripType::Cycling => (snapped.to_vec(), self.config.cycling_max_total_km(), None),
        };

        let mut feature = self.build_route(trip_type, &initial).await?;
        tracing::debug!(
            distance_km = feature.distance_km(),
            "Initial {} route: {:.1} km",
            trip_type, feature.distance_km()
        );

        if feature.distance_km() > max_km {
            let input = CandidateInput {
                initial: &initial,
                snapped,
                max_distance_m: max_km * 1000.0,
                loop_close_m,
            };

            for strategy in strategies_for(trip_type) {
                tracing::warn!(
                    strategy = %strategy,
                    distance_km = feature.distance_km(),
                    max_km,
                    "{} route {:.1} km > {} km, trying {}",
                    trip_type, feature.distance_km(), max_km, strategy
                );

                let candidate = strategy.candidate(&input);
                feature = self.build_route(trip_type, &candidate).await?;

                tracing::info!(
                    strategy = %strategy,
                    distance_km = feature.distance_km(),
                    "{} -> {:.1} km",
                    strategy, feature.distance_km()
                );
                if feature.distance_km() <= max_km {
                    break;
                }
            }
        }

        match trip_type {
            TripType::Hiking => self.finish_hiking(feature),
            TripType::Cycling => self.finish_cycling(feature),
        }
    }

    fn finish_hiking(&self, feature: RouteFeature) -> Result<TripPlan> {
        let distance_km = feature.distance_km();
        let (min_km, max_km) = (self.config.hiking_min_km, self.config.hiking_max_km);
        if distance_km < min_km || distance_km > max_km {
            return Err(AppError::Shaping(format!(
                "hiking route distance {:.1} km out of range ({}-{} km)",
                distance_km, min_km, max_km
            )));
        }

        let gap = feature.endpoint_gap_m();
        if gap > self.config.loop_close_m {
            return Err(AppError::Shaping(format!(
                "hiking route is not a loop: ends {:.0} m from its start",
                gap
            )));
        }

        let days = single_day(&feature);
        Ok(TripPlan::new(TripType::Hiking, &feature, days))
    }

    fn finish_cycling(&self, feature: RouteFeature) -> Result<TripPlan> {
        let max_total = self.config.cycling_max_total_km();
        if feature.distance_km() > max_total {
            return Err(AppError::Shaping(format!(
                "cycling route too long: {:.1} km (max {} km total)",
                feature.distance_km(),
                max_total
            )));
        }

        if feature.endpoint_gap_m() <= self.config.loop_close_m {
            return Err(AppError::Shaping(
                "cycling route ends where it starts; expected point-to-point".to_string(),
            ));
        }

        let days = split_two_days(
            &feature,
            self.config.cycling_max_km_per_day,
            self.config.day_cap_tolerance_km,
        )?;
        Ok(TripPlan::new(TripType::Cycling, &feature, days))
    }
}
