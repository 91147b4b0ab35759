use crate::constants::NULL_ISLAND_GUARD_DEG;
use crate::error::{AppError, Result};
use crate::models::Waypoint;
use crate::services::geometry::{is_straight_line, LngLat};

const MIN_WAYPOINTS: usize = 3;

/// Reject seeds that cannot describe a plausible route: too few points,
/// coordinates out of range or parked near (0, 0), or an almost straight line.
pub fn validate_waypoints(waypoints: &[Waypoint]) -> Result<()> {
    if waypoints.len() < MIN_WAYPOINTS {
        return Err(AppError::SeedValidation(format!(
            "{} waypoints, need at least {}",
            waypoints.len(),
            MIN_WAYPOINTS
        )));
    }

    if let Some((idx, wp)) = waypoints
        .iter()
        .enumerate()
        .find(|(_, wp)| !has_plausible_coordinates(wp))
    {
        return Err(AppError::SeedValidation(format!(
            "waypoint {} '{}' has implausible coordinates ({}, {})",
            idx, wp.name, wp.lat, wp.lng
        )));
    }

    let points: Vec<LngLat> = waypoints.iter().map(Waypoint::to_lng_lat).collect();
    if is_straight_line(&points) {
        return Err(AppError::SeedValidation(
            "waypoints form a nearly straight line".to_string(),
        ));
    }

    Ok(())
}

pub fn is_valid(waypoints: &[Waypoint]) -> bool {
    validate_waypoints(waypoints).is_ok()
}

fn has_plausible_coordinates(wp: &Waypoint) -> bool {
    wp.lat.is_finite()
        && wp.lng.is_finite()
        && wp.lat.abs() <= 90.0
        && wp.lng.abs() <= 180.0
        && !(wp.lat.abs() < NULL_ISLAND_GUARD_DEG && wp.lng.abs() < NULL_ISLAND_GUARD_DEG)
}
