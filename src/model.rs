//! Plan data model: locations, catalog activities, events and results.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::scorer::ScoreBreakdown;
use crate::time::{TimeOfDay, TimeWindow};
use crate::traits::Activity;

/// A deduplicated geographic point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            name: name.into(),
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    /// Distinct locations of the given activities, in first-seen order.
    ///
    /// Activities without coordinates contribute nothing.
    pub fn from_activities<A: Activity>(activities: &[A]) -> Vec<Location> {
        let mut locations: Vec<Location> = Vec::new();
        let mut seen = HashSet::new();
        for activity in activities {
            let Some(coords) = activity.coordinates() else {
                continue;
            };
            if seen.insert(crate::travel::location_key(coords)) {
                let name = activity.location_name().unwrap_or(activity.name());
                locations.push(Location::new(coords.0, coords.1, name));
            }
        }
        locations
    }
}

/// A catalog entry as held by the activity catalog service.
///
/// Build one from a raw store record with
/// [`CatalogActivity::try_from`](crate::ingest).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogActivity {
    pub id: String,
    pub category: String,
    pub name: String,
    pub location: Option<String>,
    pub district: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: String,
    pub duration_hours: f64,
    pub preferred_window: Option<TimeWindow>,
    pub is_flexible: bool,
}

impl CatalogActivity {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_hours: f64) -> Self {
        Self {
            id: id.into(),
            category: String::new(),
            name: name.into(),
            location: None,
            district: None,
            latitude: None,
            longitude: None,
            description: String::new(),
            duration_hours,
            preferred_window: None,
            is_flexible: false,
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    pub fn with_window(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.preferred_window = Some(TimeWindow::new(start, end));
        self
    }
}

impl Activity for CatalogActivity {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn location_name(&self) -> Option<&str> {
        self.location.as_deref().or(self.district.as_deref())
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    fn duration_minutes(&self) -> i32 {
        (self.duration_hours * 60.0).round() as i32
    }

    fn preferred_window(&self) -> Option<TimeWindow> {
        self.preferred_window
    }

    fn is_flexible(&self) -> bool {
        self.is_flexible
    }
}

/// Kind of a scheduled block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Activity,
    Travel,
    /// Idle time waiting for a preferred window to open.
    Wait,
    Meal,
    Sleep,
}

/// A single scheduled block within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event<Id> {
    pub kind: EventKind,
    pub name: String,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub duration_minutes: i32,
    pub location: Option<Location>,
    /// Set for `activity` events.
    pub activity_id: Option<Id>,
    /// Binding preferred window of the scheduled activity.
    pub preferred_window: Option<TimeWindow>,
}

impl<Id> Event<Id> {
    pub fn new(kind: EventKind, name: impl Into<String>, start: TimeOfDay, duration_minutes: i32) -> Self {
        Self {
            kind,
            name: name.into(),
            start,
            end: start.add_minutes(duration_minutes),
            duration_minutes,
            location: None,
            activity_id: None,
            preferred_window: None,
        }
    }

    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// Moves the block later by `minutes`, keeping its length.
    pub fn shift(&mut self, minutes: i32) {
        self.start = self.start.add_minutes(minutes);
        self.end = self.end.add_minutes(minutes);
    }

    /// Moves the start, keeping the end.
    pub fn set_start(&mut self, start: TimeOfDay) {
        self.start = start;
        self.duration_minutes = start.minutes_until(self.end);
    }

    /// Moves the end, keeping the start.
    pub fn set_end(&mut self, end: TimeOfDay) {
        self.end = end;
        self.duration_minutes = self.start.minutes_until(end);
    }
}

/// One day of a generated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay<Id> {
    /// 1-based day number.
    pub day_number: u32,
    pub events: Vec<Event<Id>>,
    /// Day start to day end, used for utilization scoring.
    pub active_window: TimeWindow,
    /// A non-sleep block runs past the travel day window.
    pub tight: bool,
}

impl<Id> ItineraryDay<Id> {
    pub fn events_of(&self, kind: EventKind) -> impl Iterator<Item = &Event<Id>> {
        self.events.iter().filter(move |event| event.kind == kind)
    }
}

/// The engine's output. Each generation replaces any prior plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlanResult<Id> {
    pub plan: Vec<ItineraryDay<Id>>,
    /// Realized day count, never below `requested_days`.
    pub total_days: u32,
    /// Day count the caller asked for, after clamping to at least 1.
    pub requested_days: u32,
    pub optimization_score: f64,
    pub score_breakdown: ScoreBreakdown,
    /// Activities without coordinates that the caller chose to scope out.
    pub excluded: Vec<Id>,
}

impl<Id> RoutePlanResult<Id> {
    /// Whether the workload forced more days than requested.
    pub fn days_adjusted(&self) -> bool {
        self.total_days > self.requested_days
    }
}
