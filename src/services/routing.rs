//! Boundary with the road/trail network services: snapping raw points onto
//! the network and routing between snapped points.

use crate::error::Result;
use crate::models::{RouteSummary, TripType};
use crate::services::geometry::LngLat;
use async_trait::async_trait;

/// One routing call's raw output, before distances are measured
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsFeature {
    pub geometry: Vec<LngLat>,
    pub summary: Option<RouteSummary>,
}

#[async_trait]
pub trait RoutingBackend: Send + Sync {
    /// Snap each location onto the network within `radius_m`. The result is
    /// positional: `None` where nothing was found, and entries may be
    /// malformed (wrong length, non-finite values).
    async fn snap(
        &self,
        trip_type: TripType,
        locations: &[LngLat],
        radius_m: f64,
    ) -> Result<Vec<Option<Vec<f64>>>>;

    /// Route through `coordinates` in order. `with_options` adds the optional
    /// avoid-features block, which some deployments do not accept.
    async fn directions(
        &self,
        trip_type: TripType,
        coordinates: &[LngLat],
        with_options: bool,
    ) -> Result<DirectionsFeature>;
}
