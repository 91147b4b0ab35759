use crate::models::Coordinates;
use crate::services::geometry::{haversine_distance, path_length_m, LngLat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    /// Single-day loop
    Hiking,
    /// Two-day point-to-point
    Cycling,
}

impl TripType {
    /// Routing profile name used by the snap and directions services
    pub fn routing_profile(&self) -> &'static str {
        match self {
            TripType::Hiking => "foot-hiking",
            TripType::Cycling => "cycling-regular",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripType::Hiking => write!(f, "hiking"),
            TripType::Cycling => write!(f, "cycling"),
        }
    }
}

impl FromStr for TripType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hiking" | "hike" => Ok(TripType::Hiking),
            "cycling" | "bike" | "bicycle" => Ok(TripType::Cycling),
            _ => Err(format!(
                "Invalid trip type: '{}'. Use 'hiking' or 'cycling'",
                s
            )),
        }
    }
}

/// Totals reported by the directions service, when it reports them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RouteSummary {
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Geometry and measured totals of one directions call. Each reshaping
/// attempt produces a new feature; none is modified after measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteFeature {
    /// `[lng, lat]` pairs
    pub geometry: Vec<LngLat>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteFeature {
    /// Use the service summary when it carries a distance, otherwise measure
    /// the geometry itself.
    pub fn measure(geometry: Vec<LngLat>, summary: Option<RouteSummary>) -> Self {
        let reported = summary.and_then(|s| s.distance).filter(|d| *d > 0.0);
        let distance_meters = reported.unwrap_or_else(|| path_length_m(&geometry));
        let duration_seconds = summary.and_then(|s| s.duration).unwrap_or(0.0);

        RouteFeature {
            geometry,
            distance_meters,
            duration_seconds,
        }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    pub fn duration_hours(&self) -> f64 {
        self.duration_seconds / 3600.0
    }

    /// Distance between the first and last geometry points (meters)
    pub fn endpoint_gap_m(&self) -> f64 {
        match (self.geometry.first(), self.geometry.last()) {
            (Some(first), Some(last)) => haversine_distance(*first, *last),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
    pub day: u32,
    pub order: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyRoute {
    pub day: u32,
    pub distance_km: f64,
    pub duration_hours: f64,
    pub points: Vec<RoutePoint>,
}

/// Terminal result of a successful planning request.
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub id: Uuid,
    pub trip_type: TripType,
    /// GeoJSON LineString of the full route
    pub geometry: geojson::Geometry,
    pub points: Vec<RoutePoint>,
    pub daily_routes: Vec<DailyRoute>,
    pub total_distance_km: f64,
    pub total_duration_hours: f64,
}

impl TripPlan {
    pub fn new(trip_type: TripType, feature: &RouteFeature, daily_routes: Vec<DailyRoute>) -> Self {
        let line: Vec<Vec<f64>> = feature.geometry.iter().map(|c| c.to_vec()).collect();
        let points = daily_routes
            .iter()
            .flat_map(|day| day.points.iter().cloned())
            .collect();

        TripPlan {
            id: Uuid::new_v4(),
            trip_type,
            geometry: geojson::Geometry::new(geojson::Value::LineString(line)),
            points,
            daily_routes,
            total_distance_km: feature.distance_km(),
            total_duration_hours: feature.duration_hours(),
        }
    }

    /// First and last coordinates of the route geometry
    pub fn endpoints(&self) -> Option<(LngLat, LngLat)> {
        match &self.geometry.value {
            geojson::Value::LineString(line) => {
                let first = line.first()?;
                let last = line.last()?;
                Some(([first[0], first[1]], [last[0], last[1]]))
            }
            _ => None,
        }
    }
}

// Request/Response types for API endpoints

#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    /// `{name, lat, lng}` object, or the same object JSON-encoded as a string
    #[serde(default)]
    pub location: Option<serde_json::Value>,
    #[serde(default, rename = "tripType", alias = "trip_type")]
    pub trip_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripLocation {
    pub name: String,
    pub coordinates: Coordinates,
}

impl PlanTripRequest {
    pub fn trip_type(&self) -> Result<TripType, String> {
        self.trip_type.parse()
    }

    pub fn location(&self) -> Result<TripLocation, String> {
        let decoded = match &self.location {
            Some(serde_json::Value::String(raw)) => serde_json::from_str::<serde_json::Value>(raw)
                .map_err(|_| "Invalid location format".to_string())?,
            Some(other) => other.clone(),
            None => serde_json::Value::Null,
        };

        let lat = numeric(decoded.get("lat"));
        let lng = numeric(decoded.get("lng"));
        let (lat, lng) = match (lat, lng) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err("Location with lat/lng is required".to_string()),
        };
        let coordinates = Coordinates::new(lat, lng)?;

        let name = decoded
            .get("name")
            .and_then(|n| n.as_str())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| "Location name is required".to_string())?;

        Ok(TripLocation {
            name: name.to_string(),
            coordinates,
        })
    }
}

/// Numbers and numeric strings both count; anything non-finite does not.
fn numeric(value: Option<&serde_json::Value>) -> Option<f64> {
    let number = match value? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

#[derive(Debug, Serialize)]
pub struct PlanTripData {
    pub route: TripPlan,
}

#[derive(Debug, Serialize)]
pub struct PlanTripResponse {
    pub success: bool,
    pub data: PlanTripData,
}

impl PlanTripResponse {
    pub fn new(route: TripPlan) -> Self {
        PlanTripResponse {
            success: true,
            data: PlanTripData { route },
        }
    }
}
