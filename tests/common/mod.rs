use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tripshape::config::PlannerConfig;
use tripshape::error::{AppError, Result};
use tripshape::models::{RouteSummary, TripType};
use tripshape::services::geometry::LngLat;
use tripshape::services::llm::{CompletionRequest, LlmClient};
use tripshape::services::routing::{DirectionsFeature, RoutingBackend};
use tripshape::services::trip_planner::TripPlanner;
use tripshape::AppState;

/// A seven-point loop around (46.0, 7.0) that passes validation
#[allow(dead_code)]
pub const LOOP_SEED: &str = r#"{"waypoints":[
    {"lat":46.00,"lng":7.00,"name":"Start"},{"lat":46.01,"lng":7.00,"name":"Mill"},
    {"lat":46.02,"lng":7.01,"name":"Ridge"},{"lat":46.02,"lng":7.02,"name":"Lake"},
    {"lat":46.01,"lng":7.03,"name":"Hut"},{"lat":46.00,"lng":7.03,"name":"Bridge"},
    {"lat":45.99,"lng":7.02,"name":"Chapel"}]}"#;

/// Open north-east line with one bend, suitable for a point-to-point ride
#[allow(dead_code)]
pub const RIDE_SEED: &str = r#"{"waypoints":[
    {"lat":46.00,"lng":7.00,"name":"Depart"},{"lat":46.10,"lng":7.05,"name":"Village"},
    {"lat":46.15,"lng":7.20,"name":"Pass"},{"lat":46.30,"lng":7.25,"name":"Valley"},
    {"lat":46.35,"lng":7.40,"name":"Arrive"}]}"#;

/// Replays canned model answers in order; errors once they run out
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedLlm {
    pub fn new(replies: &[&str]) -> Self {
        ScriptedLlm {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .map(Some)
            .ok_or_else(|| AppError::LlmApi("no scripted reply left".to_string()))
    }
}

/// Snaps points onto themselves and routes straight through them with a
/// fixed reported distance.
pub struct StubRouting {
    distance_m: f64,
    snap_ok: bool,
    snap_calls: AtomicUsize,
    directions_calls: AtomicUsize,
}

#[allow(dead_code)]
impl StubRouting {
    pub fn new(distance_m: f64) -> Self {
        StubRouting {
            distance_m,
            snap_ok: true,
            snap_calls: AtomicUsize::new(0),
            directions_calls: AtomicUsize::new(0),
        }
    }

    /// Every snap call finds nothing
    pub fn unsnappable() -> Self {
        StubRouting {
            snap_ok: false,
            ..Self::new(0.0)
        }
    }

    pub fn snap_calls(&self) -> usize {
        self.snap_calls.load(Ordering::SeqCst)
    }

    pub fn directions_calls(&self) -> usize {
        self.directions_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutingBackend for StubRouting {
    async fn snap(
        &self,
        _trip_type: TripType,
        locations: &[LngLat],
        _radius_m: f64,
    ) -> Result<Vec<Option<Vec<f64>>>> {
        self.snap_calls.fetch_add(1, Ordering::SeqCst);
        Ok(locations
            .iter()
            .map(|l| self.snap_ok.then(|| l.to_vec()))
            .collect())
    }

    async fn directions(
        &self,
        _trip_type: TripType,
        coordinates: &[LngLat],
        _with_options: bool,
    ) -> Result<DirectionsFeature> {
        self.directions_calls.fetch_add(1, Ordering::SeqCst);

        let mut geometry = Vec::new();
        for leg in coordinates.windows(2) {
            for step in 0..50 {
                let t = step as f64 / 50.0;
                geometry.push([
                    leg[0][0] + (leg[1][0] - leg[0][0]) * t,
                    leg[0][1] + (leg[1][1] - leg[0][1]) * t,
                ]);
            }
        }
        geometry.extend(coordinates.last().copied());

        Ok(DirectionsFeature {
            geometry,
            summary: Some(RouteSummary {
                distance: Some(self.distance_m),
                duration: Some(self.distance_m / 4.0),
            }),
        })
    }
}

/// Planner limits with all retry delays removed
#[allow(dead_code)]
pub fn fast_planner_config() -> PlannerConfig {
    PlannerConfig {
        seed_retry_delay: Duration::ZERO,
        invalid_seed_delay: Duration::ZERO,
        failed_route_delay: Duration::ZERO,
        use_presets: false,
        ..PlannerConfig::default()
    }
}

#[allow(dead_code)]
pub fn test_state(llm: Arc<ScriptedLlm>, routing: Arc<StubRouting>) -> Arc<AppState> {
    Arc::new(AppState {
        trip_planner: TripPlanner::new(llm, routing, fast_planner_config()),
        shutdown: CancellationToken::new(),
        llm_model: "test-model".to_string(),
        routing_base_url: "http://routing.test".to_string(),
    })
}
