//! Catalog record validation.
//!
//! Records arrive from the hosted store with every column nullable. They are
//! checked here, once, so the engine only ever sees well-formed activities.

use serde::Deserialize;

use crate::error::IngestError;
use crate::model::CatalogActivity;
use crate::time::{TimeOfDay, TimeWindow};

/// Longest bookable activity: a three-day trek or retreat.
pub const MAX_DURATION_HOURS: f64 = 72.0;

/// A raw activity row as returned by the catalog store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogRecord {
    pub id: Option<String>,
    pub category: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub district: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub duration_hours: Option<f64>,
    pub preferred_start: Option<String>,
    pub preferred_end: Option<String>,
    pub is_flexible: Option<bool>,
}

impl TryFrom<CatalogRecord> for CatalogActivity {
    type Error = IngestError;

    fn try_from(record: CatalogRecord) -> Result<Self, Self::Error> {
        let id = non_blank(record.id).ok_or(IngestError::MissingField("id"))?;
        let name = non_blank(record.name).ok_or(IngestError::MissingField("name"))?;

        let (latitude, longitude) = match (record.latitude, record.longitude) {
            (Some(lat), Some(lng)) => {
                if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
                    return Err(IngestError::CoordinatesOutOfRange { id, lat, lng });
                }
                (Some(lat), Some(lng))
            }
            (None, None) => (None, None),
            _ => return Err(IngestError::PartialCoordinates { id }),
        };

        let preferred_window = match (record.preferred_start, record.preferred_end) {
            (Some(start), Some(end)) => {
                let start = parse_time(&id, &start)?;
                let end = parse_time(&id, &end)?;
                if end < start {
                    return Err(IngestError::InvertedWindow { id });
                }
                Some(TimeWindow::new(start, end))
            }
            (None, None) => None,
            _ => return Err(IngestError::PartialWindow { id }),
        };

        // Missing or non-positive durations are clamped by the engine.
        let duration_hours = record.duration_hours.unwrap_or(0.0);
        if !duration_hours.is_finite() {
            return Err(IngestError::InvalidDuration { id });
        }
        if duration_hours > MAX_DURATION_HOURS {
            return Err(IngestError::DurationTooLong {
                id,
                hours: duration_hours,
            });
        }

        Ok(CatalogActivity {
            id,
            category: record.category.unwrap_or_default(),
            name,
            location: non_blank(record.location),
            district: non_blank(record.district),
            latitude,
            longitude,
            description: record.description.unwrap_or_default(),
            duration_hours,
            preferred_window,
            is_flexible: record.is_flexible.unwrap_or(false),
        })
    }
}

/// Validates a batch of records, failing on the first bad one.
pub fn ingest(records: Vec<CatalogRecord>) -> Result<Vec<CatalogActivity>, IngestError> {
    records.into_iter().map(CatalogActivity::try_from).collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

fn parse_time(id: &str, raw: &str) -> Result<TimeOfDay, IngestError> {
    raw.parse().map_err(|source| IngestError::InvalidTime {
        id: id.to_string(),
        source,
    })
}
