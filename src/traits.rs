//! Core domain traits for the itinerary planner.
//!
//! Host applications implement [`Activity`] for their own catalog records so
//! the engine can borrow them without copying. [`crate::model::CatalogActivity`]
//! is the bundled implementation.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::time::TimeWindow;

/// Unique identifier for planner entities.
///
/// `Ord` is required so ties can be broken deterministically.
pub trait Id: Clone + Eq + Hash + Ord + Debug {}

impl<T> Id for T where T: Clone + Eq + Hash + Ord + Debug {}

/// A bookable experience selected for the trip.
pub trait Activity {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Display name used for the scheduled event.
    fn name(&self) -> &str;

    /// Human readable place name (venue, district), if known.
    fn location_name(&self) -> Option<&str>;

    /// Location coordinates (lat, lng). `None` when the entry is not geocoded.
    fn coordinates(&self) -> Option<(f64, f64)>;

    /// Declared duration in minutes. May be zero or negative in sloppy
    /// catalog data; the engine clamps it.
    fn duration_minutes(&self) -> i32;

    /// Preferred time-of-day window, if any.
    fn preferred_window(&self) -> Option<TimeWindow>;

    /// Whether the activity's timing is flexible.
    fn is_flexible(&self) -> bool;

    /// The window the scheduler honours: the preferred window of an activity
    /// that is not flexible.
    fn binding_window(&self) -> Option<TimeWindow> {
        if self.is_flexible() {
            None
        } else {
            self.preferred_window()
        }
    }
}

/// Provides the lodging booked for a given night (1-based day number).
///
/// Lodging selection happens outside the engine; this only labels the
/// closing `sleep` block of each day.
pub trait LodgingProvider {
    fn lodging_for(&self, day_number: u32) -> Option<&str>;
}

/// Lodging provider for plans generated before hotels are chosen.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLodging;

impl LodgingProvider for NoLodging {
    fn lodging_for(&self, _day_number: u32) -> Option<&str> {
        None
    }
}

impl LodgingProvider for HashMap<u32, String> {
    fn lodging_for(&self, day_number: u32) -> Option<&str> {
        self.get(&day_number).map(String::as_str)
    }
}

/// Provides a travel-time matrix (seconds) for a set of locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<i32>>;
}
