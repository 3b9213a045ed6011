//! Planner configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::time::{TimeOfDay, TimeWindow};

/// What to do with activities that have no coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnlocatedPolicy {
    /// Schedule them without travel legs, spread across days by load.
    #[default]
    Distribute,
    /// Leave them out of the plan and report their ids in the result.
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerOptions {
    /// Clock start for each day.
    pub day_start: TimeOfDay,
    /// Boundary the closing sleep block runs to.
    pub day_end: TimeOfDay,
    /// Advisory window for non-sleep blocks; overruns mark the day tight.
    pub travel_window: TimeWindow,
    /// Allocator budget per day: activity time, overhead and travel hops.
    pub daily_ceiling_minutes: i32,
    /// Fixed allocator overhead charged per activity.
    pub activity_overhead_minutes: i32,
    /// Gap left after every activity.
    pub buffer_minutes: i32,
    /// Floor applied to zero, negative or tiny activity durations.
    pub min_activity_minutes: i32,
    /// Assumed average travel speed in km/h.
    pub average_speed_kmh: f64,
    pub min_travel_minutes: i32,
    /// Travel legs are rounded to this increment.
    pub travel_rounding_minutes: i32,
    /// Idle stretches longer than this become explicit `wait` blocks.
    pub wait_threshold_minutes: i32,
    pub meal_minutes: i32,
    pub lunch_window: TimeWindow,
    pub dinner_window: TimeWindow,
    pub unlocated: UnlocatedPolicy,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            day_start: TimeOfDay::from_hm(8, 0),
            day_end: TimeOfDay::from_hm(23, 0),
            travel_window: TimeWindow::new(TimeOfDay::from_hm(7, 0), TimeOfDay::from_hm(21, 0)),
            daily_ceiling_minutes: 8 * 60,
            activity_overhead_minutes: 15,
            buffer_minutes: 15,
            min_activity_minutes: 30,
            average_speed_kmh: 40.0,
            min_travel_minutes: 10,
            travel_rounding_minutes: 5,
            wait_threshold_minutes: 30,
            meal_minutes: 60,
            lunch_window: TimeWindow::new(TimeOfDay::from_hm(12, 0), TimeOfDay::from_hm(14, 0)),
            dinner_window: TimeWindow::new(TimeOfDay::from_hm(19, 0), TimeOfDay::from_hm(21, 0)),
            unlocated: UnlocatedPolicy::Distribute,
        }
    }
}

impl PlannerOptions {
    /// Checks the options for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.day_start >= self.day_end {
            return Err(ConfigError::InvertedDay {
                start: self.day_start.to_string(),
                end: self.day_end.to_string(),
            });
        }

        let windows = [
            ("travel", self.travel_window),
            ("lunch", self.lunch_window),
            ("dinner", self.dinner_window),
        ];
        for (field, window) in windows {
            if window.end < window.start {
                return Err(ConfigError::InvertedWindow { field });
            }
        }

        let positive = [
            ("daily_ceiling_minutes", self.daily_ceiling_minutes),
            ("min_activity_minutes", self.min_activity_minutes),
            ("travel_rounding_minutes", self.travel_rounding_minutes),
            ("meal_minutes", self.meal_minutes),
        ];
        for (field, value) in positive {
            if value <= 0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let non_negative = [
            ("activity_overhead_minutes", self.activity_overhead_minutes),
            ("buffer_minutes", self.buffer_minutes),
            ("min_travel_minutes", self.min_travel_minutes),
            ("wait_threshold_minutes", self.wait_threshold_minutes),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !self.average_speed_kmh.is_finite() || self.average_speed_kmh <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.average_speed_kmh));
        }

        Ok(())
    }

    /// Declared duration clamped to the configured floor.
    pub fn effective_duration(&self, declared_minutes: i32) -> i32 {
        declared_minutes.max(self.min_activity_minutes)
    }
}
