//! Test fixtures for itinerary-planner.
//!
//! Provides realistic test data:
//! - Real Bali landmark coordinates grouped by region
//! - A far-off mainland stop for trips that cannot fit one day

pub mod bali_landmarks;

pub use bali_landmarks::*;
