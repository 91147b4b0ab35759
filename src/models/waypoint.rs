use crate::services::geometry::LngLat;
use serde::{Deserialize, Deserializer, Serialize};

/// A named point proposed by the seed generator. Not guaranteed to lie on
/// any road or trail, and not guaranteed to be in range: anything that is not
/// a JSON number decodes to NaN so the validator can reject it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Waypoint {
    #[serde(default = "nan", deserialize_with = "number_or_nan")]
    pub lat: f64,
    #[serde(default = "nan", deserialize_with = "number_or_nan")]
    pub lng: f64,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub name: String,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Waypoint {
            lat,
            lng,
            name: name.into(),
        }
    }

    pub fn to_lng_lat(&self) -> LngLat {
        [self.lng, self.lat]
    }
}

fn nan() -> f64 {
    f64::NAN
}

fn number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(f64::NAN))
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// One candidate waypoint list for a single planning attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaypointSeed {
    pub waypoints: Vec<Waypoint>,
}

impl WaypointSeed {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        WaypointSeed { waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_deserializes_numbers() {
        let seed: WaypointSeed = serde_json::from_str(
            r#"{"waypoints":[{"lat":41.3851,"lng":2.1734,"name":"Start"},{"lat":41,"lng":2}]}"#,
        )
        .unwrap();

        assert_eq!(seed.len(), 2);
        assert_eq!(seed.waypoints[0].name, "Start");
        assert_eq!(seed.waypoints[1].lat, 41.0);
        assert_eq!(seed.waypoints[1].name, "");
    }

    #[test]
    fn test_non_numeric_coordinates_become_nan() {
        let seed: WaypointSeed = serde_json::from_str(
            r#"{"waypoints":[{"lat":"41.38","lng":null,"name":"Quoted"}]}"#,
        )
        .unwrap();

        assert!(seed.waypoints[0].lat.is_nan());
        assert!(seed.waypoints[0].lng.is_nan());

        let seed: WaypointSeed =
            serde_json::from_str(r#"{"waypoints":[{"name":"Nowhere"}]}"#).unwrap();
        assert!(seed.waypoints[0].lat.is_nan());
    }

    #[test]
    fn test_missing_waypoints_array_is_rejected() {
        assert!(serde_json::from_str::<WaypointSeed>(r#"{"points":[]}"#).is_err());
        assert!(serde_json::from_str::<WaypointSeed>(r#"{"waypoints":{}}"#).is_err());
    }
}
