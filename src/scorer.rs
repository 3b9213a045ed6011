//! Plan efficiency score.
//!
//! | Component | Weight | Definition |
//! |-----------|--------|------------|
//! | Time utilization | 0.5 | Activity and meal minutes inside each day's active window, averaged over days |
//! | Travel efficiency | 0.3 | `1 - travel / scheduled` minutes, floored at 0 |
//! | Window adherence | 0.2 | Windowed activities starting inside their window |
//!
//! The score is diagnostic only and never rejects a plan.

use serde::{Deserialize, Serialize};

use crate::model::{EventKind, ItineraryDay};

const UTILIZATION_WEIGHT: f64 = 0.5;
const TRAVEL_WEIGHT: f64 = 0.3;
const ADHERENCE_WEIGHT: f64 = 0.2;

/// Normalized sub-metrics behind the score, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub time_utilization: f64,
    pub travel_efficiency: f64,
    pub window_adherence: f64,
    /// Days with a block past the travel window. Their utilization is
    /// capped at 1.
    pub tight_days: usize,
}

impl ScoreBreakdown {
    /// Weighted total in `[0, 100]`.
    pub fn total(&self) -> f64 {
        let weighted = UTILIZATION_WEIGHT * self.time_utilization
            + TRAVEL_WEIGHT * self.travel_efficiency
            + ADHERENCE_WEIGHT * self.window_adherence;
        (100.0 * weighted).clamp(0.0, 100.0)
    }
}

/// Efficiency score of a plan, 0 for a plan without activities.
pub fn score<Id>(days: &[ItineraryDay<Id>]) -> f64 {
    score_breakdown(days).total()
}

pub fn score_breakdown<Id>(days: &[ItineraryDay<Id>]) -> ScoreBreakdown {
    let tight_days = days.iter().filter(|day| day.tight).count();
    let activities: Vec<_> = days.iter().flat_map(|day| day.events_of(EventKind::Activity)).collect();
    if activities.is_empty() {
        return ScoreBreakdown {
            tight_days,
            ..ScoreBreakdown::default()
        };
    }

    let time_utilization = days.iter().map(day_utilization).sum::<f64>() / days.len() as f64;

    let mut travel_minutes: i64 = 0;
    let mut scheduled_minutes: i64 = 0;
    for event in days.iter().flat_map(|day| &day.events) {
        let minutes = i64::from(event.duration_minutes);
        match event.kind {
            EventKind::Sleep => {}
            EventKind::Travel => {
                travel_minutes += minutes;
                scheduled_minutes += minutes;
            }
            _ => scheduled_minutes += minutes,
        }
    }
    let travel_efficiency = if scheduled_minutes > 0 {
        (1.0 - travel_minutes as f64 / scheduled_minutes as f64).max(0.0)
    } else {
        0.0
    };

    let windowed: Vec<_> = activities
        .iter()
        .filter_map(|event| event.preferred_window.map(|window| window.contains(event.start)))
        .collect();
    let window_adherence = if windowed.is_empty() {
        1.0
    } else {
        windowed.iter().filter(|inside| **inside).count() as f64 / windowed.len() as f64
    };

    ScoreBreakdown {
        time_utilization,
        travel_efficiency,
        window_adherence,
        tight_days,
    }
}

fn day_utilization<Id>(day: &ItineraryDay<Id>) -> f64 {
    let window = day.active_window;
    let available = window.duration_minutes();
    if available <= 0 {
        return 0.0;
    }
    let occupied: i32 = day
        .events
        .iter()
        .filter(|event| matches!(event.kind, EventKind::Activity | EventKind::Meal))
        .map(|event| window.overlap_minutes(event.start, event.end))
        .sum();
    (f64::from(occupied) / f64::from(available)).min(1.0)
}
