//! Stable application-wide constants.
//!
//! Values here are structural invariants and default fallbacks for
//! env-var-based configuration. Product limits that operators tune per
//! deployment live in [`PlannerConfig`](crate::config::PlannerConfig).

// --- Server defaults (used when HOST / PORT env vars are absent) ---

/// Default bind address for the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default port for the HTTP server.
pub const DEFAULT_PORT: &str = "3000";

// --- External service endpoints ---

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_OPENROUTESERVICE_BASE_URL: &str = "https://api.openrouteservice.org";

// --- Product limits (defaults for env overrides) ---

/// Cycling trips span two days, each capped at this distance.
pub const DEFAULT_CYCLING_MAX_KM_PER_DAY: f64 = 60.0;
pub const DEFAULT_HIKING_MIN_KM: f64 = 5.0;
pub const DEFAULT_HIKING_MAX_KM: f64 = 15.0;

/// Snap radii tried in order until enough waypoints land on the network.
pub const DEFAULT_SNAP_RADII_M: [f64; 3] = [200.0, 400.0, 800.0];
/// Fewer snapped points than this cannot describe a plausible route.
pub const MIN_SNAPPED_POINTS: usize = 3;
/// Snapped points closer than this to an accepted point are dropped.
pub const SNAP_DEDUP_DISTANCE_M: f64 = 30.0;
/// A path whose endpoints are farther apart than this is closed by appending its start.
pub const LOOP_CLOSE_METERS: f64 = 120.0;
/// Slack allowed on the per-day cycling cap after splitting.
pub const DAY_CAP_TOLERANCE_KM: f64 = 0.1;

// --- Retry budgets ---

pub const DEFAULT_MAX_PLANNING_ATTEMPTS: usize = 6;
/// Model calls per seed before the generator gives up.
pub const SEED_MODEL_ATTEMPTS: usize = 3;
pub const SEED_MODEL_RETRY_DELAY_MS: u64 = 1_000;
pub const INVALID_SEED_DELAY_MS: u64 = 800;
pub const FAILED_ROUTE_DELAY_MS: u64 = 900;

// --- Timeouts ---

pub const LLM_TIMEOUT_SECS: u64 = 60;
pub const SNAP_TIMEOUT_SECS: u64 = 20;
pub const DIRECTIONS_TIMEOUT_SECS: u64 = 30;

// --- Straight-line detection ---

/// Interior turn angles above this (degrees) count as "going straight on".
pub const STRAIGHT_ANGLE_THRESHOLD_DEG: f64 = 170.0;
/// A waypoint path is a straight line when more than this share of turns are straight.
pub const STRAIGHT_RATIO_THRESHOLD: f64 = 0.7;

// --- Waypoint validation ---

/// Waypoints within this many degrees of (0, 0) on both axes are treated as placeholders.
pub const NULL_ISLAND_GUARD_DEG: f64 = 0.5;

// --- Shaping fallbacks ---

/// Decimation steps tried when a route comes back too long.
pub const DECIMATION_STEPS: [usize; 2] = [2, 3];
/// Prefix budgets (fraction of the hiking maximum) for the truncation fallback.
pub const HIKING_PREFIX_FRACTIONS: [f64; 3] = [0.55, 0.45, 0.35];
/// The minimal loop aims slightly inside the circle whose circumference is the hiking maximum.
pub const MINIMAL_LOOP_RADIUS_FACTOR: f64 = 0.9;

// --- LLM request shape ---

pub const LLM_TEMPERATURE: f32 = 0.1;
pub const LLM_MAX_TOKENS: u32 = 2_000;
