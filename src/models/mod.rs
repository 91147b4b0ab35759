pub mod coordinates;
pub mod trip;
pub mod waypoint;

pub use coordinates::Coordinates;
pub use trip::{DailyRoute, RouteFeature, RoutePoint, RouteSummary, TripPlan, TripType};
pub use waypoint::{Waypoint, WaypointSeed};
