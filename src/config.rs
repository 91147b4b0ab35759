use crate::constants::*;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub groq_api_key: String,
    pub groq_base_url: String,
    pub llm_model: String,
    pub openrouteservice_api_key: String,
    pub openrouteservice_base_url: String,
    pub planner: PlannerConfig,
}

/// Product limits, retry budgets and timeouts for trip planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Per-day distance cap for two-day cycling trips (km)
    pub cycling_max_km_per_day: f64,

    /// Lower bound of the single-day hiking loop (km)
    pub hiking_min_km: f64,

    /// Upper bound of the single-day hiking loop (km)
    pub hiking_max_km: f64,

    /// Snap search radii, tried in order (meters)
    pub snap_radii_m: Vec<f64>,

    pub min_snapped_points: usize,
    pub dedup_distance_m: f64,

    /// Loop-closure tolerance (meters)
    pub loop_close_m: f64,

    pub day_cap_tolerance_km: f64,

    /// Outer planning attempts, each with a fresh seed
    pub max_attempts: usize,

    /// Model calls per seed
    pub seed_model_attempts: usize,

    pub seed_retry_delay: Duration,
    pub invalid_seed_delay: Duration,
    pub failed_route_delay: Duration,

    pub llm_timeout: Duration,
    pub snap_timeout: Duration,
    pub directions_timeout: Duration,

    /// Substitute curated waypoint sets for known locations
    pub use_presets: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cycling_max_km_per_day: DEFAULT_CYCLING_MAX_KM_PER_DAY,
            hiking_min_km: DEFAULT_HIKING_MIN_KM,
            hiking_max_km: DEFAULT_HIKING_MAX_KM,
            snap_radii_m: DEFAULT_SNAP_RADII_M.to_vec(),
            min_snapped_points: MIN_SNAPPED_POINTS,
            dedup_distance_m: SNAP_DEDUP_DISTANCE_M,
            loop_close_m: LOOP_CLOSE_METERS,
            day_cap_tolerance_km: DAY_CAP_TOLERANCE_KM,
            max_attempts: DEFAULT_MAX_PLANNING_ATTEMPTS,
            seed_model_attempts: SEED_MODEL_ATTEMPTS,
            seed_retry_delay: Duration::from_millis(SEED_MODEL_RETRY_DELAY_MS),
            invalid_seed_delay: Duration::from_millis(INVALID_SEED_DELAY_MS),
            failed_route_delay: Duration::from_millis(FAILED_ROUTE_DELAY_MS),
            llm_timeout: Duration::from_secs(LLM_TIMEOUT_SECS),
            snap_timeout: Duration::from_secs(SNAP_TIMEOUT_SECS),
            directions_timeout: Duration::from_secs(DIRECTIONS_TIMEOUT_SECS),
            use_presets: true,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| format!("Invalid {}", key)),
        Err(_) => Ok(default),
    }
}

fn parse_radii(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .map_err(|_| "Invalid PLANNER_SNAP_RADII_M".to_string())
        })
        .collect()
}

impl PlannerConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let snap_radii_m = match env::var("PLANNER_SNAP_RADII_M") {
            Ok(raw) => parse_radii(&raw)?,
            Err(_) => defaults.snap_radii_m.clone(),
        };

        let config = Self {
            cycling_max_km_per_day: env_or(
                "CYCLING_MAX_KM_PER_DAY",
                defaults.cycling_max_km_per_day,
            )?,
            hiking_min_km: env_or("HIKING_MIN_KM", defaults.hiking_min_km)?,
            hiking_max_km: env_or("HIKING_MAX_KM", defaults.hiking_max_km)?,
            snap_radii_m,
            max_attempts: env_or("PLANNER_MAX_ATTEMPTS", defaults.max_attempts)?,
            use_presets: env_or("PLANNER_USE_PRESETS", defaults.use_presets)?,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.cycling_max_km_per_day > 0.0) {
            return Err("CYCLING_MAX_KM_PER_DAY must be positive".to_string());
        }
        if !(self.hiking_min_km >= 0.0 && self.hiking_min_km < self.hiking_max_km) {
            return Err("HIKING_MIN_KM must be non-negative and below HIKING_MAX_KM".to_string());
        }
        if self.snap_radii_m.is_empty() || self.snap_radii_m.iter().any(|r| !(*r > 0.0)) {
            return Err("PLANNER_SNAP_RADII_M must list positive radii".to_string());
        }
        if self.max_attempts == 0 {
            return Err("PLANNER_MAX_ATTEMPTS must be at least 1".to_string());
        }
        Ok(())
    }

    /// Total distance budget for a two-day cycling trip (km)
    pub fn cycling_max_total_km(&self) -> f64 {
        self.cycling_max_km_per_day * 2.0
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| "Invalid PORT")?,
            groq_api_key: env::var("GROQ_API_KEY").map_err(|_| "GROQ_API_KEY must be set")?,
            groq_base_url: env::var("GROQ_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GROQ_BASE_URL.to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            openrouteservice_api_key: env::var("OPENROUTESERVICE_API_KEY")
                .map_err(|_| "OPENROUTESERVICE_API_KEY must be set")?,
            openrouteservice_base_url: env::var("OPENROUTESERVICE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENROUTESERVICE_BASE_URL.to_string()),
            planner: PlannerConfig::from_env()?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
