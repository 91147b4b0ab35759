use crate::config::PlannerConfig;
use crate::models::TripType;

const COMMON_RULES: &str = "\
REQUIREMENTS (critical):
- Generate 8-15 waypoints (logical stops/turns)
- Each waypoint MUST be on accessible streets/paths (no water/lakes/rivers/buildings)
- Spread out logically across the area (NOT a straight line)
- Each consecutive waypoint must vary in lat/lng (no uniform increments)
- Return **JSON only** with the exact fields: {\"waypoints\":[{\"lat\":<num>,\"lng\":<num>,\"name\":\"...\"}]}
";

const GOOD_EXAMPLE: &str = "\
Example of GOOD waypoints (varied, realistic):
{\"waypoints\":[{\"lat\":41.3851,\"lng\":2.1734,\"name\":\"Start - City Center\"},{\"lat\":41.3942,\"lng\":2.1734,\"name\":\"Viewpoint\"},{\"lat\":41.3968,\"lng\":2.1656,\"name\":\"Park Entrance\"}]}
";

const RETRY_NOTE: &str = "\
!!! PREVIOUS ATTEMPT HAD ISSUES. FIX THEM NOW:
- Do NOT place points over water or off-network
- Ensure spread-out, realistic points
- For cycling: start and end different cities/areas; for hiking: circular
";

/// Build the waypoint request for one model call. `is_retry` adds the
/// corrective note used from the second planning attempt onwards.
pub fn build_waypoint_prompt(
    location: &str,
    trip_type: TripType,
    config: &PlannerConfig,
    is_retry: bool,
) -> String {
    let trip_rules = match trip_type {
        TripType::Cycling => format!(
            "For CYCLING:\n\
             - A **2-day** city-to-city journey (start and end should be **different** areas/cities)\n\
             - **Not circular**\n\
             - Up to **{per_day} km per day** (max {total} km total)\n",
            per_day = config.cycling_max_km_per_day,
            total = config.cycling_max_total_km(),
        ),
        TripType::Hiking => format!(
            "For HIKING:\n\
             - **1-day CIRCULAR** route (must end where it started)\n\
             - Total distance **{min}-{max} km**\n",
            min = config.hiking_min_km,
            max = config.hiking_max_km,
        ),
    };

    let mut prompt = format!(
        "You are a travel route planner. Generate waypoints for a {trip_type} route around {location}.\n\
         {COMMON_RULES}\n\
         {trip_rules}\n\
         {GOOD_EXAMPLE}"
    );

    if is_retry {
        prompt.push('\n');
        prompt.push_str(RETRY_NOTE);
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hiking_prompt_mentions_loop_band() {
        let prompt =
            build_waypoint_prompt("Queenstown", TripType::Hiking, &PlannerConfig::default(), false);

        assert!(prompt.contains("hiking route around Queenstown"));
        assert!(prompt.contains("1-day CIRCULAR"));
        assert!(prompt.contains("5-15 km"));
        assert!(prompt.contains("NOT a straight line"));
        assert!(!prompt.contains("PREVIOUS ATTEMPT"));
    }

    #[test]
    fn test_cycling_prompt_mentions_daily_cap() {
        let prompt =
            build_waypoint_prompt("Lyon", TripType::Cycling, &PlannerConfig::default(), false);

        assert!(prompt.contains("2-day"));
        assert!(prompt.contains("Up to **60 km per day** (max 120 km total)"));
        assert!(!prompt.contains("CIRCULAR"));
    }

    #[test]
    fn test_retry_prompt_adds_corrective_note() {
        let prompt =
            build_waypoint_prompt("Lyon", TripType::Cycling, &PlannerConfig::default(), true);
        assert!(prompt.contains("PREVIOUS ATTEMPT HAD ISSUES"));
        assert!(prompt.contains("off-network"));
    }
}
