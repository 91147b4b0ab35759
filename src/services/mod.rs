pub mod geometry;
pub mod llm;
pub mod openrouteservice;
pub mod route_shaper;
pub mod routing;
pub mod seed_generator;
pub mod snapping_service;
pub mod trip_planner;
pub mod waypoint_validator;
