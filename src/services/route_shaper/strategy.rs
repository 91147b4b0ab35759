//! Fallback candidates tried, in order, when a route comes back too long.
//! Each strategy is a pure function of the request inputs.

use crate::constants::{DECIMATION_STEPS, HIKING_PREFIX_FRACTIONS, MINIMAL_LOOP_RADIUS_FACTOR};
use crate::models::TripType;
use crate::services::geometry::{
    close_loop, cumulative_distances, decimate, index_closest_to_radius, LngLat,
};
use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapingStrategy {
    /// Every `keep_every`-th point of the first request's coordinates
    Decimate { keep_every: usize },
    /// Leading snapped points covering `budget_fraction` of the distance budget
    Prefix { budget_fraction: f64 },
    /// Start plus the snapped point nearest a circle whose circumference is
    /// the distance budget
    MinimalLoop,
}

/// What every strategy derives its candidate from
#[derive(Debug, Clone, Copy)]
pub struct CandidateInput<'a> {
    /// Coordinates sent with the first directions request
    pub initial: &'a [LngLat],
    /// Snapped points as returned by the snapper
    pub snapped: &'a [LngLat],
    pub max_distance_m: f64,
    /// Loop-closure tolerance; `None` for open routes
    pub loop_close_m: Option<f64>,
}

impl ShapingStrategy {
    pub fn candidate(&self, input: &CandidateInput<'_>) -> Vec<LngLat> {
        let coords = match *self {
            ShapingStrategy::Decimate { keep_every } => decimate(input.initial, keep_every),
            ShapingStrategy::Prefix { budget_fraction } => {
                prefix_within(input.snapped, input.max_distance_m * budget_fraction)
            }
            ShapingStrategy::MinimalLoop => minimal_loop(input.snapped, input.max_distance_m),
        };

        match input.loop_close_m {
            Some(threshold) => close_loop(coords, threshold),
            None => coords,
        }
    }
}

impl fmt::Display for ShapingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapingStrategy::Decimate { keep_every } => write!(f, "decimate keepEvery={}", keep_every),
            ShapingStrategy::Prefix { budget_fraction } => {
                write!(f, "prefix {:.0}%", budget_fraction * 100.0)
            }
            ShapingStrategy::MinimalLoop => write!(f, "minimal loop"),
        }
    }
}

pub fn strategies_for(trip_type: TripType) -> Vec<ShapingStrategy> {
    match trip_type {
        TripType::Hiking => hiking_strategies(),
        TripType::Cycling => cycling_strategies(),
    }
}

pub fn cycling_strategies() -> Vec<ShapingStrategy> {
    DECIMATION_STEPS
        .iter()
        .map(|&keep_every| ShapingStrategy::Decimate { keep_every })
        .collect()
}

pub fn hiking_strategies() -> Vec<ShapingStrategy> {
    let mut strategies = cycling_strategies();
    strategies.extend(
        HIKING_PREFIX_FRACTIONS
            .iter()
            .map(|&budget_fraction| ShapingStrategy::Prefix { budget_fraction }),
    );
    strategies.push(ShapingStrategy::MinimalLoop);
    strategies
}

/// Points up to the first one whose running distance reaches `budget_m`
/// (or all of them), never fewer than two.
fn prefix_within(snapped: &[LngLat], budget_m: f64) -> Vec<LngLat> {
    let cumulative = cumulative_distances(snapped);
    let last = snapped.len().saturating_sub(1);
    let end = (1..snapped.len())
        .find(|&i| cumulative[i] >= budget_m)
        .unwrap_or(last);

    let take = (end + 1).max(2).min(snapped.len());
    snapped[..take].to_vec()
}

fn minimal_loop(snapped: &[LngLat], max_distance_m: f64) -> Vec<LngLat> {
    let Some(&start) = snapped.first() else {
        return Vec::new();
    };

    let radius_m = max_distance_m / (2.0 * PI) * MINIMAL_LOOP_RADIUS_FACTOR;
    let idx = index_closest_to_radius(snapped, start, radius_m);
    match snapped.get(idx) {
        Some(&turnaround) => vec![start, turnaround],
        None => vec![start],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ~1.1km steps north from the origin
    fn northward(n: usize) -> Vec<LngLat> {
        (0..n).map(|i| [7.0, 46.0 + i as f64 * 0.01]).collect()
    }

    fn hiking_input<'a>(initial: &'a [LngLat], snapped: &'a [LngLat]) -> CandidateInput<'a> {
        CandidateInput {
            initial,
            snapped,
            max_distance_m: 15_000.0,
            loop_close_m: Some(120.0),
        }
    }

    #[test]
    fn test_strategy_order() {
        assert_eq!(
            cycling_strategies(),
            vec![
                ShapingStrategy::Decimate { keep_every: 2 },
                ShapingStrategy::Decimate { keep_every: 3 },
            ]
        );

        let hiking = hiking_strategies();
        assert_eq!(hiking.len(), 6);
        assert_eq!(hiking[2], ShapingStrategy::Prefix { budget_fraction: 0.55 });
        assert_eq!(hiking[4], ShapingStrategy::Prefix { budget_fraction: 0.35 });
        assert_eq!(hiking[5], ShapingStrategy::MinimalLoop);
        assert_eq!(hiking[3].to_string(), "prefix 45%");
    }

    #[test]
    fn test_decimate_recloses_loops_only() {
        let snapped = northward(6);
        let initial = close_loop(snapped.clone(), 120.0);

        let loop_candidate =
            ShapingStrategy::Decimate { keep_every: 3 }.candidate(&hiking_input(&initial, &snapped));
        assert_eq!(loop_candidate.first(), loop_candidate.last());
        assert!(loop_candidate.len() < initial.len());

        let open = CandidateInput {
            initial: &snapped,
            snapped: &snapped,
            max_distance_m: 120_000.0,
            loop_close_m: None,
        };
        let open_candidate = ShapingStrategy::Decimate { keep_every: 2 }.candidate(&open);
        assert_eq!(open_candidate, vec![snapped[0], snapped[2], snapped[4], snapped[5]]);
    }

    #[test]
    fn test_prefix_uses_snapped_sequence() {
        let snapped = northward(12);
        // Initial list deliberately different: prefix must ignore it
        let initial = vec![[8.0, 47.0], [8.1, 47.1]];

        // 55% of 15km = 8.25km, first reached at index 8 (~8.9km)
        let candidate = ShapingStrategy::Prefix { budget_fraction: 0.55 }
            .candidate(&hiking_input(&initial, &snapped));
        assert_eq!(&candidate[..9], &snapped[..9]);
        assert_eq!(candidate.len(), 10);
        assert_eq!(candidate.last(), Some(&snapped[0]));
    }

    #[test]
    fn test_prefix_falls_back_to_whole_sequence() {
        let snapped = northward(3);
        let input = CandidateInput {
            initial: &snapped,
            snapped: &snapped,
            max_distance_m: 100_000.0,
            loop_close_m: None,
        };
        let candidate = ShapingStrategy::Prefix { budget_fraction: 0.35 }.candidate(&input);
        assert_eq!(candidate, snapped);
    }

    #[test]
    fn test_prefix_keeps_two_points() {
        let snapped = northward(5);
        let input = CandidateInput {
            initial: &snapped,
            snapped: &snapped,
            max_distance_m: 10.0,
            loop_close_m: None,
        };
        let candidate = ShapingStrategy::Prefix { budget_fraction: 0.35 }.candidate(&input);
        assert_eq!(candidate, snapped[..2].to_vec());
    }

    #[test]
    fn test_minimal_loop_targets_circle_radius() {
        let snapped = northward(6);
        // 15km / 2π * 0.9 ≈ 2.15km, nearest the point at index 2 (~2.2km)
        let candidate = ShapingStrategy::MinimalLoop.candidate(&hiking_input(&snapped, &snapped));
        assert_eq!(candidate, vec![snapped[0], snapped[2], snapped[0]]);
    }
}
