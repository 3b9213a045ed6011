//! itinerary-planner core
//!
//! Turns a set of selected activities and a trip length into a day-by-day
//! itinerary with travel legs, meals and overnight rest, plus an efficiency
//! score for the generated plan.

pub mod traits;
pub mod time;
pub mod error;
pub mod model;
pub mod options;
pub mod ingest;
pub mod haversine;
pub mod travel;
pub mod allocator;
pub mod scheduler;
pub mod scorer;
pub mod planner;

pub use planner::{generate_route_plan, PlanRequest, RoutePlanner};
