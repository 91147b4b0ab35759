use crate::config::PlannerConfig;
use crate::error::{AppError, Result};
use crate::models::{TripPlan, TripType};
use crate::services::llm::LlmClient;
use crate::services::route_shaper::RouteShaper;
use crate::services::routing::RoutingBackend;
use crate::services::seed_generator::{PresetCatalog, SeedGenerator};
use crate::services::snapping_service::NetworkSnapper;
use crate::services::waypoint_validator::validate_waypoints;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// Outer retry loop: seed, validate, snap, shape. Every attempt starts from
/// a fresh seed; the first attempt that survives all stages wins.
pub struct TripPlanner {
    seed_generator: SeedGenerator,
    snapper: NetworkSnapper,
    shaper: RouteShaper,
    config: PlannerConfig,
}

impl TripPlanner {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        routing: Arc<dyn RoutingBackend>,
        config: PlannerConfig,
    ) -> Self {
        let presets = config.use_presets.then(|| PresetCatalog::new(clock_seed()));

        TripPlanner {
            seed_generator: SeedGenerator::new(llm, presets, config.clone()),
            snapper: NetworkSnapper::new(routing.clone(), config.clone()),
            shaper: RouteShaper::new(routing, config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan a trip with no external cancellation
    pub async fn plan_route(&self, location: &str, trip_type: TripType) -> Result<TripPlan> {
        self.plan_route_with_cancel(location, trip_type, &CancellationToken::new())
            .await
    }

    /// Plan a trip, giving up with [`AppError::Cancelled`] as soon as `cancel`
    /// fires. The in-flight external call is dropped and no further attempt
    /// starts.
    #[instrument(skip(self, cancel))]
    pub async fn plan_route_with_cancel(
        &self,
        location: &str,
        trip_type: TripType,
        cancel: &CancellationToken,
    ) -> Result<TripPlan> {
        let max_attempts = self.config.max_attempts;

        for attempt in 1..=max_attempts {
            if cancel.is_cancelled() {
                return Err(AppError::Cancelled);
            }

            let outcome =
                until_cancelled(cancel, self.attempt(location, trip_type, attempt)).await?;

            let delay = match outcome {
                Ok(plan) => {
                    tracing::info!(
                        attempt,
                        distance_km = plan.total_distance_km,
                        days = plan.daily_routes.len(),
                        "Planned {} trip for {} on attempt {}/{} ({:.1} km)",
                        trip_type, location, attempt, max_attempts, plan.total_distance_km
                    );
                    return Ok(plan);
                }
                Err(e @ (AppError::SeedGeneration(_) | AppError::SeedValidation(_))) => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        "Attempt {}/{}: unusable seed: {}",
                        attempt, max_attempts, e
                    );
                    self.config.invalid_seed_delay
                }
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        "Attempt {}/{}: route failed: {}",
                        attempt, max_attempts, e
                    );
                    self.config.failed_route_delay
                }
                // Cancelled or exhausted
                Err(e) => return Err(e),
            };

            if attempt < max_attempts {
                sleep_or_cancel(cancel, delay).await?;
            }
        }

        tracing::error!(
            attempts = max_attempts,
            "Unable to plan {} trip for {} after {} attempts",
            trip_type, location, max_attempts
        );
        Err(AppError::ExhaustedAttempts {
            attempts: max_attempts,
        })
    }

    async fn attempt(
        &self,
        location: &str,
        trip_type: TripType,
        attempt: usize,
    ) -> Result<TripPlan> {
        let seed = self
            .seed_generator
            .generate(location, trip_type, attempt > 1)
            .await?;
        validate_waypoints(&seed.waypoints)?;

        let snapped = self.snapper.snap(&seed.waypoints, trip_type).await?;
        self.shaper.shape(&snapped, trip_type).await
    }
}

/// `Err(Cancelled)` if the token fires first, otherwise the future's output
async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        out = fut => Ok(out),
    }
}

async fn sleep_or_cancel(cancel: &CancellationToken, delay: Duration) -> Result<()> {
    until_cancelled(cancel, tokio::time::sleep(delay)).await
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
