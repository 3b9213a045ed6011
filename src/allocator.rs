//! Geo-clustering allocator: splits activities into day buckets.
//!
//! Locations are chained nearest-neighbor style starting from the first
//! located activity. Each hop's travel time and each activity's duration plus
//! overhead count against the day's budget; when the next activity would
//! overflow it, the chain continues in a fresh day. The chain also closes a
//! day early once it holds its balanced share of the workload, so a light
//! trip spreads across the requested days instead of front-loading day one.
//!
//! Activities without coordinates go to whichever day has the most room.

use std::mem;

use tracing::{debug, info};

use crate::options::PlannerOptions;
use crate::traits::Activity;
use crate::travel::TravelTable;

#[derive(Debug)]
struct Stop<'a, A> {
    /// Position in the caller's activity list.
    order: usize,
    activity: &'a A,
    load: i32,
}

#[derive(Debug)]
struct Bucket<'a, A> {
    stops: Vec<Stop<'a, A>>,
    load: i32,
}

impl<'a, A> Bucket<'a, A> {
    fn new() -> Self {
        Self {
            stops: Vec::new(),
            load: 0,
        }
    }

    fn push(&mut self, stop: Stop<'a, A>, cost: i32) {
        self.load = self.load.saturating_add(cost);
        self.stops.push(stop);
    }

    fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Groups activities into day buckets.
///
/// Returns at least `requested_days` buckets (itself at least 1). More are
/// returned only when the workload cannot fit the daily ceiling. Each bucket
/// keeps the caller's activity order.
pub fn allocate<'a, A: Activity>(
    activities: &[&'a A],
    table: &TravelTable,
    requested_days: u32,
    options: &PlannerOptions,
) -> Vec<Vec<&'a A>> {
    let requested = requested_days.max(1) as usize;
    let ceiling = options.daily_ceiling_minutes;

    let mut by_location: Vec<Vec<Stop<'a, A>>> = (0..table.len()).map(|_| Vec::new()).collect();
    let mut unlocated: Vec<Stop<'a, A>> = Vec::new();
    let mut seed = None;
    let mut total_load: i32 = 0;

    for (order, activity) in activities.iter().copied().enumerate() {
        let load = options
            .effective_duration(activity.duration_minutes())
            .saturating_add(options.activity_overhead_minutes);
        total_load = total_load.saturating_add(load);
        let stop = Stop { order, activity, load };
        match table.locate(activity) {
            Some(location) => {
                seed.get_or_insert(location);
                by_location[location].push(stop);
            }
            None => unlocated.push(stop),
        }
    }

    let share = div_ceil(total_load, requested as i32);
    let mut buckets: Vec<Bucket<'a, A>> = Vec::new();
    let mut current = Bucket::new();
    let mut head: Option<usize> = None;
    let mut next = seed;

    while let Some(location) = next {
        let mut hop = table.leg_minutes(head, Some(location)).unwrap_or(0);
        for stop in mem::take(&mut by_location[location]) {
            let over_ceiling = current.load.saturating_add(hop).saturating_add(stop.load) > ceiling;
            let share_met = buckets.len() + 1 < requested && current.load >= share;
            if !current.is_empty() && (over_ceiling || share_met) {
                buckets.push(mem::replace(&mut current, Bucket::new()));
                hop = 0;
            }
            let cost = hop.saturating_add(stop.load);
            current.push(stop, cost);
            hop = 0;
        }
        head = Some(location);
        next = nearest_pending(table, location, &by_location);
    }
    if !current.is_empty() {
        buckets.push(current);
    }

    let clustered = buckets.len();
    while buckets.len() < requested {
        buckets.push(Bucket::new());
    }

    for stop in unlocated {
        let roomiest = buckets
            .iter()
            .enumerate()
            .filter(|(_, bucket)| bucket.is_empty() || bucket.load.saturating_add(stop.load) <= ceiling)
            .min_by_key(|(day, bucket)| (bucket.load, *day))
            .map(|(day, _)| day);
        match roomiest {
            Some(day) => {
                let load = stop.load;
                buckets[day].push(stop, load);
            }
            None => {
                let mut bucket = Bucket::new();
                let load = stop.load;
                bucket.push(stop, load);
                buckets.push(bucket);
            }
        }
    }

    debug!(
        activities = activities.len(),
        locations = table.len(),
        clustered,
        buckets = buckets.len(),
        "allocated activities to days"
    );
    if buckets.len() > requested {
        info!(
            requested,
            realized = buckets.len(),
            total_load,
            "workload does not fit the requested days, extending the trip"
        );
    }

    buckets
        .into_iter()
        .map(|bucket| {
            let mut stops = bucket.stops;
            stops.sort_by_key(|stop| stop.order);
            stops.into_iter().map(|stop| stop.activity).collect()
        })
        .collect()
}

/// Nearest location that still has unassigned activities.
///
/// Ties go to the location holding the smallest activity id.
fn nearest_pending<A: Activity>(
    table: &TravelTable,
    from: usize,
    by_location: &[Vec<Stop<'_, A>>],
) -> Option<usize> {
    by_location
        .iter()
        .enumerate()
        .filter_map(|(location, stops)| {
            let smallest_id = stops.iter().map(|stop| stop.activity.id()).min()?;
            Some((table.seconds(from, location), smallest_id, location))
        })
        .min()
        .map(|(_, _, location)| location)
}

fn div_ceil(numerator: i32, denominator: i32) -> i32 {
    numerator / denominator + i32::from(numerator % denominator != 0)
}
