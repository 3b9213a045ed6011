//! Error types raised at the planner's boundaries.
//!
//! Planning itself never fails; these cover malformed configuration and
//! catalog records rejected before they reach the engine.

use thiserror::Error;

/// Errors from parsing an `HH:MM` time-of-day string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("`{0}` is not a HH:MM time")]
    Malformed(String),
    #[error("{hour:02}:{minute:02} is not a valid time of day")]
    OutOfRange { hour: i32, minute: i32 },
}

/// Errors from [`crate::options::PlannerOptions::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The day must start before it ends.
    #[error("day start {start} is not before day end {end}")]
    InvertedDay { start: String, end: String },
    /// A window option has its end before its start.
    #[error("{field} window ends before it starts")]
    InvertedWindow { field: &'static str },
    /// A minute-valued option must be strictly positive.
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i32 },
    /// Travel estimates divide by the average speed.
    #[error("average speed must be a positive finite number, got {0}")]
    InvalidSpeed(f64),
}

/// Errors raised while validating a raw catalog record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IngestError {
    #[error("catalog record is missing required field `{0}`")]
    MissingField(&'static str),
    #[error("activity {id} has only one of latitude/longitude")]
    PartialCoordinates { id: String },
    #[error("activity {id} has out-of-range coordinates ({lat}, {lng})")]
    CoordinatesOutOfRange { id: String, lat: f64, lng: f64 },
    #[error("activity {id} has only one end of its preferred window")]
    PartialWindow { id: String },
    #[error("activity {id} has a preferred window ending before it starts")]
    InvertedWindow { id: String },
    #[error("activity {id} has an invalid preferred time")]
    InvalidTime {
        id: String,
        #[source]
        source: TimeParseError,
    },
    #[error("activity {id} has a non-finite duration")]
    InvalidDuration { id: String },
    #[error("activity {id} lasts {hours} hours, longer than any bookable activity")]
    DurationTooLong { id: String, hours: f64 },
}
