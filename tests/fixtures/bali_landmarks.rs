//! Real Bali landmarks for realistic itinerary fixtures.
//!
//! Coordinates sourced from OpenStreetMap, rounded to four decimals.

use itinerary_planner::model::{CatalogActivity, Location};

/// A named place with coordinates.
#[derive(Debug, Clone)]
pub struct Landmark {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Landmark {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lng, self.name)
    }

    /// A catalog activity held at this landmark.
    pub fn activity(&self, id: &str, duration_hours: f64) -> CatalogActivity {
        let mut activity = CatalogActivity::new(id, self.name, duration_hours).at(self.lat, self.lng);
        activity.location = Some(self.name.to_string());
        activity
    }
}

// ============================================================================
// Ubud and surroundings
// ============================================================================

pub const UBUD: &[Landmark] = &[
    Landmark::new("Sacred Monkey Forest", -8.5188, 115.2585),
    Landmark::new("Ubud Palace", -8.5069, 115.2625),
    Landmark::new("Ubud Art Market", -8.5072, 115.2628),
    Landmark::new("Campuhan Ridge Walk", -8.5030, 115.2540),
    Landmark::new("Goa Gajah", -8.5234, 115.2869),
    Landmark::new("Tegallalang Rice Terrace", -8.4312, 115.2793),
    Landmark::new("Tirta Empul", -8.4154, 115.3153),
];

// ============================================================================
// Central highlands
// ============================================================================

pub const HIGHLANDS: &[Landmark] = &[
    Landmark::new("Mount Batur", -8.2421, 115.3751),
    Landmark::new("Ulun Danu Beratan", -8.2752, 115.1668),
    Landmark::new("Jatiluwih Rice Terraces", -8.3700, 115.1310),
    Landmark::new("Gitgit Waterfall", -8.1970, 115.1390),
];

// ============================================================================
// East coast
// ============================================================================

pub const EAST: &[Landmark] = &[
    Landmark::new("Besakih Temple", -8.3739, 115.4517),
    Landmark::new("Tirta Gangga", -8.4120, 115.5870),
    Landmark::new("Lempuyang Temple", -8.3910, 115.6310),
    Landmark::new("Amed Beach", -8.3370, 115.6600),
];

// ============================================================================
// South coast and Bukit peninsula
// ============================================================================

pub const SOUTH: &[Landmark] = &[
    Landmark::new("Uluwatu Temple", -8.8291, 115.0849),
    Landmark::new("Padang Padang Beach", -8.8108, 115.1003),
    Landmark::new("Jimbaran Bay", -8.7760, 115.1660),
    Landmark::new("Garuda Wisnu Kencana", -8.8104, 115.1676),
    Landmark::new("Nusa Dua Beach", -8.8000, 115.2320),
    Landmark::new("Seminyak Beach", -8.6913, 115.1572),
    Landmark::new("Tanah Lot", -8.6215, 115.0868),
    Landmark::new("Sanur Beach", -8.6783, 115.2630),
];

// ============================================================================
// Nusa Penida
// ============================================================================

pub const NUSA_PENIDA: &[Landmark] = &[
    Landmark::new("Kelingking Beach", -8.7500, 115.4745),
    Landmark::new("Crystal Bay", -8.7160, 115.4590),
    Landmark::new("Broken Beach", -8.7305, 115.4505),
];

/// Labuan Bajo, Flores: roughly 500 km east of Ubud.
pub const LABUAN_BAJO: Landmark = Landmark::new("Labuan Bajo", -8.4964, 119.8877);

/// Every Bali landmark in region order.
pub fn all_bali() -> Vec<Landmark> {
    [UBUD, HIGHLANDS, EAST, SOUTH, NUSA_PENIDA].concat()
}
