//! Hand-curated waypoint sets for well-known locations.

use crate::models::{TripType, Waypoint, WaypointSeed};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Mutex;

type PresetRoute = &'static [(f64, f64, &'static str)];

const QUEENSTOWN_HIKES: &[PresetRoute] = &[
    // Gardens, esplanade and a short Sunshine Bay detour
    &[
        (-45.0343, 168.6576, "Start - Queenstown Gardens Entrance"),
        (-45.0318, 168.6621, "Marine Parade Boardwalk"),
        (-45.0332, 168.6518, "St Omer Park"),
        (-45.0349, 168.6395, "Sunshine Bay Track Access"),
        (-45.0320, 168.6395, "Fernhill Rd / Richards Park"),
        (-45.0306, 168.6627, "Ballarat St / Camp St"),
        (-45.0343, 168.6576, "Finish - Queenstown Gardens Entrance"),
    ],
    // Skyline base and Gorge Rd
    &[
        (-45.0343, 168.6576, "Start - Queenstown Gardens Entrance"),
        (-45.0329, 168.6535, "Skyline Gondola Base"),
        (-45.0291, 168.6455, "Skyline Loop Trail Viewpoint"),
        (-45.0248, 168.6612, "Recreation Ground (Gorge Rd)"),
        (-45.0306, 168.6627, "Ballarat St / Camp St"),
        (-45.0343, 168.6576, "Finish - Queenstown Gardens Entrance"),
    ],
    // Lake Esplanade and Fernhill lookout
    &[
        (-45.0343, 168.6576, "Start - Queenstown Gardens Entrance"),
        (-45.0339, 168.6472, "Lake Esplanade / Brunswick St"),
        (-45.0346, 168.6440, "Lake Esplanade / Fernhill Rd"),
        (-45.0370, 168.6405, "Fernhill Scenic Lookout"),
        (-45.0320, 168.6395, "Fernhill Rd / Richards Park"),
        (-45.0314, 168.6628, "Beach St / Shotover St"),
        (-45.0343, 168.6576, "Finish - Queenstown Gardens Entrance"),
    ],
    // Waterfront circuit
    &[
        (-45.03430, 168.65760, "Start/Finish - Queenstown Gardens Entrance"),
        (-45.03205, 168.66190, "Marine Parade Boardwalk"),
        (-45.03140, 168.66275, "Beach St / Shotover St"),
        (-45.03290, 168.65920, "Marine Parade / Church St"),
        (-45.03325, 168.65180, "St Omer Park"),
        (-45.03425, 168.64650, "Lake Esplanade (Lakeview)"),
        (-45.03485, 168.64290, "Lake Esplanade / Fernhill Rd"),
        (-45.03395, 168.64760, "Brunswick St / Lake Esplanade"),
        (-45.03270, 168.65890, "Marine Parade (Gardens side)"),
        (-45.03430, 168.65760, "Finish - Queenstown Gardens Entrance"),
    ],
    // Skyline and Ben Lomond lower loop
    &[
        (-45.03430, 168.65760, "Start/Finish - Queenstown Gardens Entrance"),
        (-45.03325, 168.66390, "Stanley St / Shotover St"),
        (-45.03280, 168.65360, "Skyline Gondola Base (Brecon St)"),
        (-45.03020, 168.64910, "Access to Skyline Rd"),
        (-45.02860, 168.64610, "Ben Lomond Track Lower Junction"),
        (-45.02760, 168.65190, "Descent toward Robins Rd"),
        (-45.02480, 168.66120, "Recreation Ground (Gorge Rd)"),
        (-45.02990, 168.66230, "Robins Rd / Ballarat St"),
        (-45.03200, 168.66140, "Marine Parade (lakefront)"),
        (-45.03430, 168.65760, "Finish - Queenstown Gardens Entrance"),
    ],
    // Sunshine Bay and Fernhill loop
    &[
        (-45.03430, 168.65760, "Start/Finish - Queenstown Gardens Entrance"),
        (-45.03325, 168.65180, "St Omer Park"),
        (-45.03425, 168.64650, "Lake Esplanade (Lakeview)"),
        (-45.03485, 168.64290, "Lake Esplanade / Fernhill Rd"),
        (-45.03490, 168.63960, "Sunshine Bay Track Access"),
        (-45.03670, 168.63270, "Sunshine Bay Beach / Lookout"),
        (-45.03600, 168.63660, "Climb to Fernhill Rd (switchback)"),
        (-45.03360, 168.64220, "Fernhill Rd (eastbound)"),
        (-45.03395, 168.64720, "Back to Lake Esplanade"),
        (-45.03180, 168.66210, "Marine Parade Boardwalk"),
        (-45.03430, 168.65760, "Finish - Queenstown Gardens Entrance"),
    ],
];

struct PresetGroup {
    /// Lowercase substring matched against the location label
    keyword: &'static str,
    trip_type: TripType,
    routes: &'static [PresetRoute],
}

const PRESET_GROUPS: &[PresetGroup] = &[PresetGroup {
    keyword: "queenstown",
    trip_type: TripType::Hiking,
    routes: QUEENSTOWN_HIKES,
}];

struct SelectionState {
    rng: StdRng,
    /// Last route index handed out, per group keyword
    last_choice: HashMap<&'static str, usize>,
}

/// Picks curated seeds pseudo-randomly, never handing out the same route
/// twice in a row for a location. Shared by concurrent requests.
pub struct PresetCatalog {
    groups: &'static [PresetGroup],
    state: Mutex<SelectionState>,
}

impl PresetCatalog {
    pub fn new(seed: u64) -> Self {
        PresetCatalog {
            groups: PRESET_GROUPS,
            state: Mutex::new(SelectionState {
                rng: StdRng::seed_from_u64(seed),
                last_choice: HashMap::new(),
            }),
        }
    }

    /// A curated seed for this location and trip type, if one exists
    pub fn pick(&self, location: &str, trip_type: TripType) -> Option<WaypointSeed> {
        let label = location.to_lowercase();
        let group = self
            .groups
            .iter()
            .find(|g| g.trip_type == trip_type && label.contains(g.keyword))?;

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let previous = state.last_choice.get(group.keyword).copied();

        let candidates: Vec<usize> = (0..group.routes.len())
            .filter(|idx| group.routes.len() == 1 || Some(*idx) != previous)
            .collect();
        let idx = *candidates.choose(&mut state.rng)?;
        state.last_choice.insert(group.keyword, idx);
        drop(state);

        tracing::info!(
            location = %location,
            preset = idx,
            "Using curated {} preset #{} for {}",
            trip_type, idx, location
        );

        let waypoints = group.routes[idx]
            .iter()
            .map(|(lat, lng, name)| Waypoint::new(*lat, *lng, *name))
            .collect();
        Some(WaypointSeed::new(waypoints))
    }
}
