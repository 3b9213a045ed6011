//! Location deduplication and cached travel times.

use std::collections::HashMap;

use tracing::warn;

use crate::haversine::HaversineMatrix;
use crate::model::Location;
use crate::options::PlannerOptions;
use crate::traits::{Activity, DistanceMatrixProvider};

/// Coordinates rounded to six decimals identify a location.
pub(crate) fn location_key(location: (f64, f64)) -> String {
    format!("{:.6},{:.6}", location.0, location.1)
}

/// Distinct plan locations with a pairwise travel-time matrix.
#[derive(Debug, Clone)]
pub struct TravelTable {
    locations: Vec<Location>,
    index: HashMap<String, usize>,
    /// Seconds, indexed like `locations`.
    matrix: Vec<Vec<i32>>,
    min_travel_minutes: i32,
    rounding_minutes: i32,
}

impl TravelTable {
    /// Builds the table from caller-supplied locations plus any activity
    /// coordinates they do not cover.
    ///
    /// Caller-supplied entries win on duplicate coordinates, so their display
    /// names are kept. A provider returning a mis-sized matrix is replaced by
    /// the haversine estimate.
    pub fn build<A, M>(
        known: &[Location],
        activities: &[&A],
        provider: &M,
        options: &PlannerOptions,
    ) -> Self
    where
        A: Activity,
        M: DistanceMatrixProvider,
    {
        let mut locations = Vec::new();
        let mut index = HashMap::new();

        let derived = activities.iter().filter_map(|activity| {
            activity.coordinates().map(|(lat, lng)| {
                let name = activity.location_name().unwrap_or(activity.name());
                Location::new(lat, lng, name)
            })
        });
        for location in known.iter().cloned().chain(derived) {
            let key = location_key(location.coords());
            if index.contains_key(&key) {
                continue;
            }
            index.insert(key, locations.len());
            locations.push(location);
        }

        let coords: Vec<(f64, f64)> = locations.iter().map(Location::coords).collect();
        let mut matrix = provider.matrix_for(&coords);
        let well_formed = matrix.len() == coords.len() && matrix.iter().all(|row| row.len() == coords.len());
        if !well_formed {
            warn!(
                expected = coords.len(),
                rows = matrix.len(),
                "distance provider returned a mis-sized matrix, falling back to haversine"
            );
            matrix = HaversineMatrix::new(options.average_speed_kmh).matrix_for(&coords);
        }

        Self {
            locations,
            index,
            matrix,
            min_travel_minutes: options.min_travel_minutes,
            rounding_minutes: options.travel_rounding_minutes,
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn location(&self, index: usize) -> &Location {
        &self.locations[index]
    }

    /// Index of the activity's location, or `None` when it has no coordinates.
    pub fn locate<A: Activity>(&self, activity: &A) -> Option<usize> {
        let coords = activity.coordinates()?;
        self.index.get(&location_key(coords)).copied()
    }

    /// Raw matrix travel time in seconds.
    pub fn seconds(&self, from: usize, to: usize) -> i32 {
        self.matrix[from][to]
    }

    /// Scheduled length of a travel leg in minutes.
    ///
    /// `None` when no leg is needed: same location, or either end unknown.
    /// Otherwise rounded to the configured increment and floored at the
    /// minimum leg length.
    pub fn leg_minutes(&self, from: Option<usize>, to: Option<usize>) -> Option<i32> {
        let (from, to) = (from?, to?);
        if from == to {
            return None;
        }
        let seconds = self.seconds(from, to);
        if seconds <= 0 {
            return None;
        }
        let increments = (f64::from(seconds) / 60.0 / f64::from(self.rounding_minutes)).round() as i32;
        Some((increments * self.rounding_minutes).max(self.min_travel_minutes))
    }
}
