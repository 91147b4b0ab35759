use crate::error::{AppError, Result};
use crate::models::{DailyRoute, RouteFeature, RoutePoint};
use crate::services::geometry::cumulative_distances;

/// The whole route as day 1
pub fn single_day(feature: &RouteFeature) -> Vec<DailyRoute> {
    vec![DailyRoute {
        day: 1,
        distance_km: feature.distance_km(),
        duration_hours: feature.duration_hours(),
        points: route_points(feature, |_| 1),
    }]
}

/// Split a route into two days near its midpoint, keeping each day under
/// `max_km_per_day` (plus `tolerance_km`).
pub fn split_two_days(
    feature: &RouteFeature,
    max_km_per_day: f64,
    tolerance_km: f64,
) -> Result<Vec<DailyRoute>> {
    if feature.geometry.len() < 2 {
        return Err(AppError::Shaping(
            "route geometry too short to split into days".to_string(),
        ));
    }

    let total_m = feature.distance_meters;
    let cumulative = rescaled_cumulative(feature);
    let target_m = day1_target_km(feature.distance_km(), max_km_per_day) * 1000.0;
    let split_idx = split_index(&cumulative, target_m);

    let day1_m = cumulative[split_idx];
    let day2_m = total_m - day1_m;
    let share = |meters: f64| feature.duration_seconds * (meters / total_m.max(1.0)) / 3600.0;

    let (day1_points, day2_points): (Vec<RoutePoint>, Vec<RoutePoint>) =
        route_points(feature, |i| if i <= split_idx { 1 } else { 2 })
            .into_iter()
            .partition(|p| p.day == 1);

    let days = vec![
        DailyRoute {
            day: 1,
            distance_km: day1_m / 1000.0,
            duration_hours: share(day1_m),
            points: day1_points,
        },
        DailyRoute {
            day: 2,
            distance_km: day2_m / 1000.0,
            duration_hours: share(day2_m),
            points: day2_points,
        },
    ];

    let limit = max_km_per_day + tolerance_km;
    if days.iter().any(|d| d.distance_km > limit) {
        return Err(AppError::Shaping(format!(
            "cycling day distance exceeded {} km (day1={:.1}, day2={:.1})",
            max_km_per_day, days[0].distance_km, days[1].distance_km
        )));
    }

    tracing::debug!(
        split_idx,
        day1_km = days[0].distance_km,
        day2_km = days[1].distance_km,
        "Split route at point {}: {:.1} km + {:.1} km",
        split_idx, days[0].distance_km, days[1].distance_km
    );

    Ok(days)
}

/// Half the total, moved so that neither day exceeds the cap when possible
fn day1_target_km(total_km: f64, max_km_per_day: f64) -> f64 {
    let mut target = (total_km / 2.0).min(max_km_per_day);
    if total_km - target > max_km_per_day {
        target = total_km - max_km_per_day;
    }
    target.max(0.0)
}

/// Geometry distances scaled so the last entry equals the reported total
fn rescaled_cumulative(feature: &RouteFeature) -> Vec<f64> {
    let cumulative = cumulative_distances(&feature.geometry);
    let measured = cumulative.last().copied().unwrap_or(0.0);
    if measured <= 0.0 {
        return cumulative;
    }

    let scale = feature.distance_meters / measured;
    cumulative.into_iter().map(|d| d * scale).collect()
}

/// Index in `1..len-1` (so day 2 keeps at least one point) closest to `target_m`
fn split_index(cumulative: &[f64], target_m: f64) -> usize {
    let upper = cumulative.len().saturating_sub(2).max(1);
    (1..=upper)
        .min_by(|&a, &b| {
            (cumulative[a] - target_m)
                .abs()
                .total_cmp(&(cumulative[b] - target_m).abs())
        })
        .unwrap_or(1)
}

fn route_points(feature: &RouteFeature, day_of: impl Fn(usize) -> u32) -> Vec<RoutePoint> {
    feature
        .geometry
        .iter()
        .enumerate()
        .map(|(order, &[lng, lat])| RoutePoint {
            lat,
            lng,
            day: day_of(order),
            order,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RouteSummary;

    // Evenly spaced points heading east
    fn eastward(points: usize, distance_m: f64, duration_s: f64) -> RouteFeature {
        let geometry = (0..points).map(|i| [7.0 + i as f64 * 0.01, 46.0]).collect();
        RouteFeature::measure(
            geometry,
            Some(RouteSummary {
                distance: Some(distance_m),
                duration: Some(duration_s),
            }),
        )
    }

    #[test]
    fn test_day1_target_clamping() {
        assert_eq!(day1_target_km(100.0, 60.0), 50.0);
        assert_eq!(day1_target_km(118.0, 60.0), 59.0);
        assert_eq!(day1_target_km(130.0, 60.0), 70.0);
        assert_eq!(day1_target_km(0.0, 60.0), 0.0);
    }

    #[test]
    fn test_split_118km_stays_under_cap() {
        let feature = eastward(501, 118_000.0, 8.0 * 3600.0);
        let days = split_two_days(&feature, 60.0, 0.1).unwrap();

        assert_eq!(days.len(), 2);
        assert!(days[0].distance_km <= 60.1);
        assert!(days[1].distance_km <= 60.1);
        assert!((days[0].distance_km + days[1].distance_km - 118.0).abs() < 0.01);
        assert!((days[0].duration_hours + days[1].duration_hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_points_are_partitioned_in_order() {
        let feature = eastward(11, 20_000.0, 3600.0);
        let days = split_two_days(&feature, 60.0, 0.1).unwrap();

        let day1_last = days[0].points.last().unwrap().order;
        let day2_first = days[1].points.first().unwrap().order;
        assert_eq!(day2_first, day1_last + 1);
        assert_eq!(days[0].points.len() + days[1].points.len(), 11);
        assert!(days[0].points.iter().all(|p| p.day == 1));
        assert!(days[1].points.iter().all(|p| p.day == 2));
        assert_eq!(day1_last, 5);
    }

    #[test]
    fn test_rejects_day_over_cap() {
        // Three points: the only split leaves a ~109km second day
        let geometry = vec![[7.0, 46.0], [7.01, 46.0], [8.5, 46.0]];
        let feature = RouteFeature::measure(
            geometry,
            Some(RouteSummary {
                distance: Some(110_000.0),
                duration: Some(20_000.0),
            }),
        );
        let err = split_two_days(&feature, 60.0, 0.1).unwrap_err();
        assert!(matches!(err, AppError::Shaping(_)));
    }

    #[test]
    fn test_single_day_covers_everything() {
        let feature = eastward(5, 9_000.0, 7200.0);
        let days = single_day(&feature);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].distance_km, 9.0);
        assert_eq!(days[0].duration_hours, 2.0);
        assert_eq!(days[0].points.len(), 5);
        assert_eq!(days[0].points[4].order, 4);
    }
}
