//! Distance and shape helpers over `[lng, lat]` coordinate lists.
//! Pure functions, no I/O.

use crate::constants::{STRAIGHT_ANGLE_THRESHOLD_DEG, STRAIGHT_RATIO_THRESHOLD};

/// A `[lng, lat]` pair in the order GeoJSON and the routing services use.
pub type LngLat = [f64; 2];

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two `[lng, lat]` points, in meters
pub fn haversine_distance(a: LngLat, b: LngLat) -> f64 {
    let [lng1, lat1] = a;
    let [lng2, lat2] = b;

    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Keep the first, the last and every `keep_every`-th point.
/// Paths of two points or fewer are returned unchanged.
pub fn decimate(coords: &[LngLat], keep_every: usize) -> Vec<LngLat> {
    if coords.len() <= 2 {
        return coords.to_vec();
    }

    let step = keep_every.max(1);
    let last = coords.len() - 1;
    coords
        .iter()
        .enumerate()
        .filter(|(i, _)| *i == 0 || *i == last || i % step == 0)
        .map(|(_, c)| *c)
        .collect()
}

/// Running distance (meters) up to and including each index; index 0 is 0.
pub fn cumulative_distances(coords: &[LngLat]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(coords.len());
    let mut total = 0.0;

    for (i, point) in coords.iter().enumerate() {
        if i > 0 {
            total += haversine_distance(coords[i - 1], *point);
        }
        cumulative.push(total);
    }

    cumulative
}

/// Total length of a path in meters
pub fn path_length_m(coords: &[LngLat]) -> f64 {
    coords
        .windows(2)
        .map(|w| haversine_distance(w[0], w[1]))
        .sum()
}

/// True when more than `ratio_threshold` of the interior angles along the path
/// are wider than `angle_threshold_deg`, i.e. the path barely turns.
///
/// The angle at each interior point is measured between the segments back to
/// the previous point and on to the next one, so 180° means "straight on".
/// Zero-length segments are skipped and do not count towards the ratio.
pub fn is_nearly_straight(
    points: &[LngLat],
    angle_threshold_deg: f64,
    ratio_threshold: f64,
) -> bool {
    if points.len() < 3 {
        return false;
    }

    let mut straight = 0usize;
    let mut measured = 0usize;

    for window in points.windows(3) {
        let [prev, curr, next] = [window[0], window[1], window[2]];

        let back = (prev[0] - curr[0], prev[1] - curr[1]);
        let ahead = (next[0] - curr[0], next[1] - curr[1]);

        let back_len = back.0.hypot(back.1);
        let ahead_len = ahead.0.hypot(ahead.1);
        if back_len == 0.0 || ahead_len == 0.0 {
            continue;
        }

        let cos_theta = (back.0 * ahead.0 + back.1 * ahead.1) / (back_len * ahead_len);
        let angle = cos_theta.clamp(-1.0, 1.0).acos().to_degrees();

        measured += 1;
        if angle > angle_threshold_deg {
            straight += 1;
        }
    }

    measured > 0 && (straight as f64 / measured as f64) > ratio_threshold
}

/// [`is_nearly_straight`] with the default thresholds (170°, 70%)
pub fn is_straight_line(points: &[LngLat]) -> bool {
    is_nearly_straight(points, STRAIGHT_ANGLE_THRESHOLD_DEG, STRAIGHT_RATIO_THRESHOLD)
}

/// Append the first point when the path ends more than `close_threshold_m`
/// away from where it started.
pub fn close_loop(mut coords: Vec<LngLat>, close_threshold_m: f64) -> Vec<LngLat> {
    if coords.len() < 2 {
        return coords;
    }

    let start = coords[0];
    let end = coords[coords.len() - 1];
    if haversine_distance(start, end) > close_threshold_m {
        coords.push(start);
    }
    coords
}

/// Index (>= 1) of the point whose distance from `origin` is closest to
/// `target_m`. Earliest index wins ties; returns 1 for paths shorter than two.
pub fn index_closest_to_radius(coords: &[LngLat], origin: LngLat, target_m: f64) -> usize {
    let mut best_idx = 1;
    let mut best_diff = f64::INFINITY;

    for (i, point) in coords.iter().enumerate().skip(1) {
        let diff = (haversine_distance(origin, *point) - target_m).abs();
        if diff < best_diff {
            best_diff = diff;
            best_idx = i;
        }
    }

    best_idx
}
