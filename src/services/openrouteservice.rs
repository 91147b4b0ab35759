use crate::error::{AppError, Result};
use crate::models::{RouteSummary, TripType};
use crate::services::geometry::LngLat;
use crate::services::routing::{DirectionsFeature, RoutingBackend};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const EXTRA_INFO: [&str; 3] = ["waytype", "steepness", "surface"];
const AVOID_FEATURES: [&str; 1] = ["ferries"];

/// OpenRouteService snap and directions endpoints
#[derive(Clone)]
pub struct OpenRouteServiceClient {
    client: Client,
    api_key: String,
    base_url: String,
    snap_timeout: Duration,
    directions_timeout: Duration,
}

impl OpenRouteServiceClient {
    pub fn new(
        api_key: String,
        base_url: String,
        snap_timeout: Duration,
        directions_timeout: Duration,
    ) -> Self {
        OpenRouteServiceClient {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            snap_timeout,
            directions_timeout,
        }
    }

    fn snap_url(&self, trip_type: TripType) -> String {
        format!("{}/v2/snap/{}/json", self.base_url, trip_type.routing_profile())
    }

    fn directions_url(&self, trip_type: TripType) -> String {
        format!(
            "{}/v2/directions/{}/geojson",
            self.base_url,
            trip_type.routing_profile()
        )
    }

    async fn post_json<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(url)
            .header("Authorization", &self.api_key)
            .header("Accept", "application/json, application/geo+json")
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::RoutingApi {
                status: None,
                message: format!("Request failed: {}", e),
            })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = error_message(&error_text);
        tracing::warn!(
            status = %status,
            url = %url,
            "OpenRouteService HTTP error {}: {}",
            status, message
        );
        Err(AppError::RoutingApi {
            status: Some(status.as_u16()),
            message,
        })
    }
}

/// Pull `error.message` (or a plain `error` string) out of an error body
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    parsed
        .as_ref()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
        })
        .map(str::to_string)
        .unwrap_or_else(|| body.to_string())
}

#[derive(Debug, Serialize)]
struct SnapRequest<'a> {
    locations: &'a [LngLat],
    radius: f64,
}

#[derive(Debug, Deserialize)]
struct SnapResponse {
    #[serde(default)]
    locations: Vec<Option<SnapLocation>>,
}

#[derive(Debug, Deserialize)]
struct SnapLocation {
    #[serde(default)]
    location: Option<Vec<f64>>,
}

#[derive(Debug, Serialize)]
struct DirectionsRequest<'a> {
    coordinates: &'a [LngLat],
    instructions: bool,
    extra_info: [&'static str; 3],
    geometry_simplify: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<DirectionsOptions>,
}

#[derive(Debug, Serialize)]
struct DirectionsOptions {
    avoid_features: [&'static str; 1],
}

impl<'a> DirectionsRequest<'a> {
    fn new(coordinates: &'a [LngLat], with_options: bool) -> Self {
        DirectionsRequest {
            coordinates,
            instructions: true,
            extra_info: EXTRA_INFO,
            geometry_simplify: false,
            options: with_options.then_some(DirectionsOptions {
                avoid_features: AVOID_FEATURES,
            }),
        }
    }
}

/// First feature of a directions FeatureCollection, as `[lng, lat]` pairs
/// plus the optional summary.
fn first_route(collection: geojson::FeatureCollection) -> Result<DirectionsFeature> {
    let feature = collection
        .features
        .into_iter()
        .next()
        .ok_or_else(|| AppError::RoutingApi {
            status: None,
            message: "No route found".to_string(),
        })?;

    let geometry = match feature.geometry.as_ref().map(|g| &g.value) {
        Some(geojson::Value::LineString(line)) => line
            .iter()
            .filter(|p| p.len() >= 2)
            .map(|p| [p[0], p[1]])
            .collect::<Vec<LngLat>>(),
        _ => {
            return Err(AppError::RoutingApi {
                status: None,
                message: "Route feature has no LineString geometry".to_string(),
            })
        }
    };

    let summary = feature
        .property("summary")
        .and_then(|s| serde_json::from_value::<RouteSummary>(s.clone()).ok());

    Ok(DirectionsFeature { geometry, summary })
}

#[async_trait]
impl RoutingBackend for OpenRouteServiceClient {
    async fn snap(
        &self,
        trip_type: TripType,
        locations: &[LngLat],
        radius_m: f64,
    ) -> Result<Vec<Option<Vec<f64>>>> {
        tracing::debug!(
            points = locations.len(),
            radius_m,
            profile = trip_type.routing_profile(),
            "Snap request: {} points within {}m ({})",
            locations.len(), radius_m, trip_type.routing_profile()
        );

        let body = SnapRequest {
            locations,
            radius: radius_m,
        };
        let response = self
            .post_json(&self.snap_url(trip_type), &body, self.snap_timeout)
            .await?;

        let parsed: SnapResponse = response.json().await.map_err(|e| AppError::RoutingApi {
            status: None,
            message: format!("Failed to parse snap response: {}", e),
        })?;

        Ok(parsed
            .locations
            .into_iter()
            .map(|entry| entry.and_then(|l| l.location))
            .collect())
    }

    async fn directions(
        &self,
        trip_type: TripType,
        coordinates: &[LngLat],
        with_options: bool,
    ) -> Result<DirectionsFeature> {
        if coordinates.len() < 2 {
            return Err(AppError::InvalidRequest(
                "At least 2 coordinates required".to_string(),
            ));
        }

        tracing::debug!(
            points = coordinates.len(),
            with_options,
            profile = trip_type.routing_profile(),
            "Directions request: {} points ({})",
            coordinates.len(), trip_type.routing_profile()
        );

        let body = DirectionsRequest::new(coordinates, with_options);
        let response = self
            .post_json(&self.directions_url(trip_type), &body, self.directions_timeout)
            .await?;

        let collection: geojson::FeatureCollection =
            response.json().await.map_err(|e| AppError::RoutingApi {
                status: None,
                message: format!("Failed to parse directions response: {}", e),
            })?;

        let route = first_route(collection)?;
        tracing::debug!(
            path_points = route.geometry.len(),
            distance_m = ?route.summary.and_then(|s| s.distance),
            "Directions response: {} path points",
            route.geometry.len()
        );
        Ok(route)
    }
}
