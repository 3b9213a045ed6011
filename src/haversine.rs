//! Straight-line travel estimates between activity locations.
//!
//! Planning uses these unless the host plugs in its own
//! [`DistanceMatrixProvider`]. The default 40 km/h assumes slow island roads.

use crate::traits::DistanceMatrixProvider;

const DEFAULT_SPEED_KMH: f64 = 40.0;

const EARTH_RADIUS_KM: f64 = 6371.0;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Travel times between stops as the crow flies at a fixed driving speed.
///
/// Also the fallback when a host-supplied provider returns a matrix that does
/// not match the plan's locations.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Average door-to-door speed between stops, km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    /// Usually built from `PlannerOptions::average_speed_kmh`.
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance in kilometers between two `(lat, lng)` stops.
    pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (from_lat, to_lat) = (from.0.to_radians(), to.0.to_radians());
        let half_dlat = (to.0 - from.0).to_radians() / 2.0;
        let half_dlng = (to.1 - from.1).to_radians() / 2.0;

        let h = half_dlat.sin().powi(2) + from_lat.cos() * to_lat.cos() * half_dlng.sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
    }

    /// Whole seconds needed to cover `km` at the configured speed.
    fn drive_seconds(&self, km: f64) -> i32 {
        (km / self.speed_kmh * SECONDS_PER_HOUR).round() as i32
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<i32>> {
        locations
            .iter()
            .map(|&from| {
                locations
                    .iter()
                    .map(|&to| self.drive_seconds(Self::haversine_km(from, to)))
                    .collect()
            })
            .collect()
    }
}
