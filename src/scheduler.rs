//! Daily scheduler: turns one day bucket into a timed list of events.
//!
//! The day is built in three passes:
//!
//! 1. A walk from day start picks the next activity (windowed activities in
//!    window-start order, others by cheapest next hop) and emits travel,
//!    wait and activity blocks as the clock advances.
//! 2. Lunch and dinner are spliced into free time inside their windows,
//!    or placed after the block in progress when no gap fits.
//! 3. A sleep block closes the day.

use tracing::debug;

use crate::model::{Event, EventKind, ItineraryDay, Location};
use crate::options::PlannerOptions;
use crate::time::{TimeOfDay, TimeWindow};
use crate::traits::{Activity, LodgingProvider};
use crate::travel::TravelTable;

/// Schedules one day.
///
/// Every activity in `bucket` yields exactly one `activity` event. The day
/// window is advisory: long activities are kept whole and mark the day tight.
pub fn schedule<A, L>(
    bucket: &[&A],
    day_number: u32,
    table: &TravelTable,
    lodging: &L,
    options: &PlannerOptions,
) -> ItineraryDay<A::Id>
where
    A: Activity,
    L: LodgingProvider + ?Sized,
{
    let mut walk: DayWalk<'_, A::Id> = DayWalk::new(table, options);
    let mut timed: Vec<(usize, &A, TimeWindow)> = Vec::new();
    let mut free: Vec<(usize, &A)> = Vec::new();
    for (position, activity) in bucket.iter().copied().enumerate() {
        match activity.binding_window() {
            Some(window) => timed.push((position, activity, window)),
            None => free.push((position, activity)),
        }
    }
    // Stable: equal window starts keep bucket order.
    timed.sort_by_key(|(_, _, window)| window.start);
    let mut timed = timed.into_iter().peekable();

    loop {
        let nearest_free = walk.nearest(&free);
        let take_free = match (timed.peek(), nearest_free) {
            (None, None) => break,
            (None, Some(_)) => true,
            (Some(_), None) => false,
            (Some((_, next_timed, window)), Some(index)) => {
                walk.finishes_before(free[index].1, *next_timed, window.start)
            }
        };

        if let Some(index) = nearest_free.filter(|_| take_free) {
            let (_, activity) = free.remove(index);
            walk.place(activity);
        } else if let Some((_, activity, _)) = timed.next() {
            walk.place(activity);
        }
    }

    let mut events = walk.events;
    place_meal(&mut events, "Lunch", options.lunch_window, options);
    place_meal(&mut events, "Dinner", options.dinner_window, options);

    let tight = events.iter().any(|event| event.end > options.travel_window.end);
    if tight {
        debug!(day_number, "day runs past the travel window");
    }

    let sleep_start = events.last().map_or(options.day_start, |event| event.end);
    let sleep_end = sleep_start.max(options.day_end);
    let label = match lodging.lodging_for(day_number) {
        Some(hotel) => format!("Overnight at {hotel}"),
        None => "Overnight rest".to_string(),
    };
    events.push(Event::new(
        EventKind::Sleep,
        label,
        sleep_start,
        sleep_start.minutes_until(sleep_end),
    ));

    ItineraryDay {
        day_number,
        events,
        active_window: TimeWindow::new(options.day_start, options.day_end),
        tight,
    }
}

/// Clock and position while walking through a day.
struct DayWalk<'t, Id> {
    table: &'t TravelTable,
    options: &'t PlannerOptions,
    clock: TimeOfDay,
    /// Last known location; unlocated activities leave it unchanged.
    here: Option<usize>,
    events: Vec<Event<Id>>,
}

impl<'t, Id: Clone> DayWalk<'t, Id> {
    fn new(table: &'t TravelTable, options: &'t PlannerOptions) -> Self {
        Self {
            table,
            options,
            clock: options.day_start,
            here: None,
            events: Vec::new(),
        }
    }

    fn leg_to<A: Activity>(&self, from: Option<usize>, activity: &A) -> i32 {
        self.table.leg_minutes(from, self.table.locate(activity)).unwrap_or(0)
    }

    fn location(&self, index: Option<usize>) -> Option<Location> {
        index.map(|index| self.table.location(index).clone())
    }

    /// Index into `free` of the cheapest next hop, ties by bucket position.
    fn nearest<A: Activity>(&self, free: &[(usize, &A)]) -> Option<usize> {
        free.iter()
            .enumerate()
            .min_by_key(|(_, (position, activity))| (self.leg_to(self.here, *activity), *position))
            .map(|(index, _)| index)
    }

    /// Whether `candidate`, its buffer and the onward hop all fit before
    /// `next` must start.
    fn finishes_before<A: Activity>(&self, candidate: &A, next: &A, deadline: TimeOfDay) -> bool {
        let there = self.table.locate(candidate).or(self.here);
        let finish = self
            .clock
            .add_minutes(self.leg_to(self.here, candidate))
            .add_minutes(self.options.effective_duration(candidate.duration_minutes()))
            .add_minutes(self.options.buffer_minutes)
            .add_minutes(self.leg_to(there, next));
        finish <= deadline
    }

    fn place<A: Activity<Id = Id>>(&mut self, activity: &A) {
        let destination = self.table.locate(activity);
        let leg = self.table.leg_minutes(self.here, destination);
        let window = activity.binding_window();

        if let Some(window) = window {
            let depart_by = window.start.add_minutes(-leg.unwrap_or(0));
            let idle = self.clock.minutes_until(depart_by);
            if idle > 0 {
                if idle > self.options.wait_threshold_minutes {
                    let wait = Event::new(
                        EventKind::Wait,
                        format!("Free time before {}", activity.name()),
                        self.clock,
                        idle,
                    );
                    self.events.push(wait.with_location(self.location(self.here)));
                }
                self.clock = depart_by;
            }
        }

        if let (Some(minutes), Some(place)) = (leg, self.location(destination)) {
            let travel = Event::new(EventKind::Travel, format!("Travel to {}", place.name), self.clock, minutes);
            self.events.push(travel.with_location(Some(place)));
            self.clock = self.clock.add_minutes(minutes);
        }

        let duration = self.options.effective_duration(activity.duration_minutes());
        let mut event = Event::new(EventKind::Activity, activity.name(), self.clock, duration)
            .with_location(self.location(destination));
        event.activity_id = Some(activity.id().clone());
        event.preferred_window = window;
        self.events.push(event);

        self.clock = self.clock.add_minutes(duration).add_minutes(self.options.buffer_minutes);
        self.here = destination.or(self.here);
    }
}

/// Splices a meal into the timeline.
///
/// The meal goes into the first free stretch (wait blocks count as free) that
/// holds it inside `window`. Failing that it follows the block in progress at
/// the window start, and later blocks move back to make room. A block held to
/// its preferred window is never pushed out of it: the meal then moves past
/// that block instead.
fn place_meal<Id: Clone>(events: &mut Vec<Event<Id>>, name: &str, window: TimeWindow, options: &PlannerOptions) {
    let length = options.meal_minutes;
    let threshold = options.wait_threshold_minutes;
    let earliest = window.start.max(options.day_start);
    let latest = window.end.min(options.day_end).add_minutes(-length);
    if earliest > latest {
        return;
    }

    let mut start = free_slot(events, earliest, latest, length, options.day_end).unwrap_or_else(|| {
        events
            .iter()
            .filter(|event| event.kind != EventKind::Wait)
            .filter(|event| event.start <= earliest || event.kind == EventKind::Meal)
            .map(|event| event.end)
            .fold(earliest, TimeOfDay::max)
    });

    loop {
        let meal = Event::new(EventKind::Meal, name, start, length);
        let mut trial = events.clone();
        carve_waits(&mut trial, &meal, threshold);
        let position = trial.partition_point(|event| event.start < meal.start);
        trial.insert(position, meal);

        match displaced_window_end(&trial, position) {
            Some(after) => {
                debug!(meal = name, from = %start, to = %after, "meal moved to keep a window");
                start = after;
            }
            None => {
                ripple(&mut trial, position, threshold);
                *events = trial;
                return;
            }
        }
    }
}

/// End of the first windowed activity that rippling from `from` would push
/// out of a window it currently starts in.
fn displaced_window_end<Id>(events: &[Event<Id>], from: usize) -> Option<TimeOfDay> {
    let mut prev_end = events[from].end;
    for event in &events[from + 1..] {
        if event.start >= prev_end {
            return None;
        }
        if event.kind == EventKind::Wait {
            if event.end > prev_end {
                return None;
            }
            continue;
        }
        if let Some(window) = event.preferred_window {
            if event.kind == EventKind::Activity && window.contains(event.start) && !window.contains(prev_end) {
                return Some(event.end);
            }
        }
        prev_end = prev_end.add_minutes(event.start.minutes_until(event.end));
    }
    None
}

/// Earliest start in `[earliest, latest]` where `length` minutes are free.
fn free_slot<Id>(
    events: &[Event<Id>],
    earliest: TimeOfDay,
    latest: TimeOfDay,
    length: i32,
    day_end: TimeOfDay,
) -> Option<TimeOfDay> {
    let mut gaps = Vec::new();
    let mut cursor = TimeOfDay::MIDNIGHT;
    for event in events.iter().filter(|event| event.kind != EventKind::Wait) {
        gaps.push((cursor, event.start));
        cursor = cursor.max(event.end);
    }
    gaps.push((cursor, day_end.max(cursor)));

    gaps.into_iter().find_map(|(gap_start, gap_end)| {
        let start = gap_start.max(earliest);
        (start <= latest && start.add_minutes(length) <= gap_end).then_some(start)
    })
}

/// Cuts `meal` out of any wait block it overlaps, dropping leftovers that
/// are no longer worth showing.
fn carve_waits<Id: Clone>(events: &mut Vec<Event<Id>>, meal: &Event<Id>, threshold: i32) {
    let mut carved = Vec::with_capacity(events.len() + 1);
    for event in events.drain(..) {
        let overlaps = event.start < meal.end && meal.start < event.end;
        if event.kind != EventKind::Wait || !overlaps {
            carved.push(event);
            continue;
        }
        if event.start < meal.start {
            let mut before = event.clone();
            before.set_end(meal.start);
            if before.duration_minutes > threshold {
                carved.push(before);
            }
        }
        if event.end > meal.end {
            let mut after = event;
            after.set_start(meal.end);
            if after.duration_minutes > threshold {
                carved.push(after);
            }
        }
    }
    *events = carved;
}

/// Pushes blocks after `from` later until nothing overlaps. Wait blocks
/// absorb the shift before anything else moves, and disappear once no more
/// than `threshold` minutes of them are left.
fn ripple<Id>(events: &mut Vec<Event<Id>>, from: usize, threshold: i32) {
    let mut prev_end = events[from].end;
    let mut index = from + 1;
    while index < events.len() {
        if events[index].start >= prev_end {
            break;
        }
        if events[index].kind == EventKind::Wait {
            if prev_end.minutes_until(events[index].end) <= threshold {
                events.remove(index);
                continue;
            }
            events[index].set_start(prev_end);
            break;
        }
        let delta = events[index].start.minutes_until(prev_end);
        events[index].shift(delta);
        prev_end = events[index].end;
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine::HaversineMatrix;
    use crate::model::CatalogActivity;
    use crate::traits::NoLodging;

    fn hm(hour: i32, minute: i32) -> TimeOfDay {
        TimeOfDay::from_hm(hour, minute)
    }

    fn day_for(activities: &[CatalogActivity]) -> ItineraryDay<String> {
        let options = PlannerOptions::default();
        let refs: Vec<&CatalogActivity> = activities.iter().collect();
        let table = TravelTable::build(&[], &refs, &HaversineMatrix::default(), &options);
        schedule(&refs, 1, &table, &NoLodging, &options)
    }

    fn kinds(day: &ItineraryDay<String>) -> Vec<EventKind> {
        day.events.iter().map(|event| event.kind).collect()
    }

    fn assert_ordered(day: &ItineraryDay<String>) {
        for pair in day.events.windows(2) {
            assert!(
                pair[0].end <= pair[1].start,
                "{} ({}-{}) overlaps {} ({}-{})",
                pair[0].name,
                pair[0].start,
                pair[0].end,
                pair[1].name,
                pair[1].start,
                pair[1].end
            );
        }
    }

    #[test]
    fn test_rest_day_has_meals_and_sleep() {
        let day = day_for(&[]);
        assert_eq!(kinds(&day), vec![EventKind::Meal, EventKind::Meal, EventKind::Sleep]);
        assert_eq!(day.events[0].start, hm(12, 0));
        assert_eq!(day.events[1].start, hm(19, 0));
        assert_eq!(day.events[2].start, hm(20, 0));
        assert_eq!(day.events[2].end, hm(23, 0));
        assert!(!day.tight);
    }

    #[test]
    fn test_same_spot_activities_have_no_travel() {
        let activities = vec![
            CatalogActivity::new("a", "Monkey Forest", 2.0).at(-8.5188, 115.2585),
            CatalogActivity::new("b", "Art Market", 2.0).at(-8.5188, 115.2585),
            CatalogActivity::new("c", "Palace", 2.0).at(-8.5188, 115.2585),
        ];
        let day = day_for(&activities);
        assert_ordered(&day);
        assert_eq!(day.events_of(EventKind::Travel).count(), 0);
        let names: Vec<&str> = day.events_of(EventKind::Activity).map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Monkey Forest", "Art Market", "Palace"]);
        // 08:00-10:00, 10:15-12:15, lunch spills to 12:15-13:15, 13:15-15:15.
        let starts: Vec<TimeOfDay> = day.events_of(EventKind::Activity).map(|e| e.start).collect();
        assert_eq!(starts, vec![hm(8, 0), hm(10, 15), hm(13, 15)]);
        assert_eq!(day.events.last().map(|e| e.kind), Some(EventKind::Sleep));
    }

    #[test]
    fn test_travel_leg_between_locations() {
        let activities = vec![
            CatalogActivity::new("a", "Ubud", 1.0).at(-8.5000, 115.2600),
            CatalogActivity::new("b", "Sanur", 1.0).at(-8.7000, 115.2600),
        ];
        let day = day_for(&activities);
        let travel: Vec<&Event<String>> = day.events_of(EventKind::Travel).collect();
        assert_eq!(travel.len(), 1);
        assert_eq!(travel[0].start, hm(9, 15));
        assert_eq!(travel[0].duration_minutes, 35);
        assert_eq!(travel[0].name, "Travel to Sanur");
        let second = day.events_of(EventKind::Activity).nth(1).unwrap();
        assert_eq!(second.start, hm(9, 50));
    }

    #[test]
    fn test_waits_for_window_and_marks_idle_time() {
        let activities = vec![
            CatalogActivity::new("a", "Sunset dance", 1.0)
                .at(-8.8291, 115.0849)
                .with_window(hm(9, 0), hm(10, 0)),
        ];
        let day = day_for(&activities);
        assert_eq!(day.events[0].kind, EventKind::Wait);
        assert_eq!(day.events[0].start, hm(8, 0));
        assert_eq!(day.events[0].end, hm(9, 0));
        assert_eq!(day.events[1].kind, EventKind::Activity);
        assert_eq!(day.events[1].start, hm(9, 0));
    }

    #[test]
    fn test_short_idle_is_implicit() {
        let activities = vec![
            CatalogActivity::new("a", "Breakfast tour", 1.0).with_window(hm(8, 20), hm(9, 0)),
        ];
        let day = day_for(&activities);
        assert_eq!(day.events[0].kind, EventKind::Activity);
        assert_eq!(day.events[0].start, hm(8, 20));
    }

    #[test]
    fn test_free_activity_fills_time_before_window() {
        let activities = vec![
            CatalogActivity::new("late", "Kecak", 1.0)
                .at(-8.5188, 115.2585)
                .with_window(hm(15, 0), hm(16, 0)),
            CatalogActivity::new("early", "Rice terrace", 2.0).at(-8.5188, 115.2585),
        ];
        let day = day_for(&activities);
        assert_ordered(&day);
        let order: Vec<&str> = day.events_of(EventKind::Activity).map(|e| e.name.as_str()).collect();
        assert_eq!(order, vec!["Rice terrace", "Kecak"]);
        let kecak = day.events_of(EventKind::Activity).nth(1).unwrap();
        assert_eq!(kecak.start, hm(15, 0));
    }

    #[test]
    fn test_lunch_carved_out_of_wait() {
        let activities = vec![
            CatalogActivity::new("a", "Morning", 1.0).at(-8.5188, 115.2585),
            CatalogActivity::new("b", "Afternoon", 1.0)
                .at(-8.5188, 115.2585)
                .with_window(hm(16, 0), hm(17, 0)),
        ];
        let day = day_for(&activities);
        assert_ordered(&day);
        let lunch = day.events_of(EventKind::Meal).next().unwrap();
        assert_eq!(lunch.start, hm(12, 0));
        let waits: Vec<(TimeOfDay, TimeOfDay)> = day.events_of(EventKind::Wait).map(|e| (e.start, e.end)).collect();
        assert_eq!(waits, vec![(hm(9, 15), hm(12, 0)), (hm(13, 0), hm(16, 0))]);
    }

    #[test]
    fn test_long_activity_gets_meal_appended_and_tight_flag() {
        let activities = vec![CatalogActivity::new("a", "Volcano trek", 14.0).at(-8.2421, 115.3751)];
        let day = day_for(&activities);
        assert_ordered(&day);
        // 08:00-22:00 blocks both meal windows.
        let meals: Vec<TimeOfDay> = day.events_of(EventKind::Meal).map(|e| e.start).collect();
        assert_eq!(meals, vec![hm(22, 0), hm(23, 0)]);
        assert!(day.tight);
        let sleep = day.events.last().unwrap();
        assert_eq!(sleep.kind, EventKind::Sleep);
        assert_eq!(sleep.start, hm(24, 0));
        assert_eq!(sleep.duration_minutes, 0);
    }

    #[test]
    fn test_appended_meal_pushes_later_blocks() {
        let activities = vec![
            CatalogActivity::new("a", "Diving", 5.0).at(-8.2750, 115.5940),
            CatalogActivity::new("b", "Snorkel", 1.0).at(-8.2750, 115.5940),
        ];
        let day = day_for(&activities);
        assert_ordered(&day);
        // Diving 08:00-13:00 covers the start of lunch; 13:15 snorkel
        // leaves no room before 14:00, so lunch follows the dive.
        let lunch = day.events_of(EventKind::Meal).next().unwrap();
        assert_eq!(lunch.start, hm(13, 0));
        let snorkel = day.events_of(EventKind::Activity).nth(1).unwrap();
        assert_eq!(snorkel.start, hm(14, 0));
    }

    #[test]
    fn test_appended_meal_keeps_windowed_block_in_window() {
        let activities = vec![
            CatalogActivity::new("a", "Diving", 5.0).at(-8.2750, 115.5940),
            CatalogActivity::new("b", "Boat transfer", 1.0)
                .at(-8.2750, 115.5940)
                .with_window(hm(13, 15), hm(13, 30)),
        ];
        let day = day_for(&activities);
        assert_ordered(&day);
        let boat = day.events_of(EventKind::Activity).nth(1).unwrap();
        assert_eq!(boat.start, hm(13, 15));
        let lunch = day.events_of(EventKind::Meal).next().unwrap();
        assert_eq!(lunch.start, hm(14, 15));
    }

    #[test]
    fn test_ripple_drops_wait_trimmed_below_threshold() {
        let mut events: Vec<Event<u32>> = vec![
            Event::new(EventKind::Meal, "Lunch", hm(12, 0), 60),
            Event::new(EventKind::Wait, "Free time before Dance", hm(12, 30), 50),
            Event::new(EventKind::Activity, "Dance", hm(13, 20), 60),
        ];
        ripple(&mut events, 0, 30);
        let kinds: Vec<EventKind> = events.iter().map(|event| event.kind).collect();
        assert_eq!(kinds, vec![EventKind::Meal, EventKind::Activity]);
        assert_eq!(events[1].start, hm(13, 20));
    }

    #[test]
    fn test_ripple_trims_long_wait() {
        let mut events: Vec<Event<u32>> = vec![
            Event::new(EventKind::Meal, "Lunch", hm(12, 0), 60),
            Event::new(EventKind::Wait, "Free time before Dance", hm(12, 30), 120),
            Event::new(EventKind::Activity, "Dance", hm(14, 30), 60),
        ];
        ripple(&mut events, 0, 30);
        assert_eq!(events[1].start, hm(13, 0));
        assert_eq!(events[1].duration_minutes, 90);
        assert_eq!(events[2].start, hm(14, 30));
    }

    #[test]
    fn test_sleep_uses_lodging_name() {
        let options = PlannerOptions::default();
        let table = TravelTable::build::<CatalogActivity, _>(&[], &[], &HaversineMatrix::default(), &options);
        let lodging = std::collections::HashMap::from([(2_u32, "Hanging Gardens".to_string())]);
        let day = schedule::<CatalogActivity, _>(&[], 2, &table, &lodging, &options);
        assert_eq!(day.events.last().unwrap().name, "Overnight at Hanging Gardens");
        let day_one = schedule::<CatalogActivity, _>(&[], 1, &table, &lodging, &options);
        assert_eq!(day_one.events.last().unwrap().name, "Overnight rest");
    }
}
