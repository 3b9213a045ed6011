//! Route plan generation: allocator, scheduler and scorer wired together.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::allocator::allocate;
use crate::error::ConfigError;
use crate::haversine::HaversineMatrix;
use crate::model::{Location, RoutePlanResult};
use crate::options::{PlannerOptions, UnlocatedPolicy};
use crate::scheduler::schedule;
use crate::scorer::score_breakdown;
use crate::traits::{Activity, DistanceMatrixProvider, LodgingProvider, NoLodging};
use crate::travel::TravelTable;

/// Generates a plan with default options and haversine travel estimates.
///
/// `duration_days` below 1 is treated as 1.
pub fn generate_route_plan<A: Activity>(
    activities: &[A],
    locations: &[Location],
    duration_days: i32,
) -> RoutePlanResult<A::Id> {
    RoutePlanner::<HaversineMatrix>::default().plan(activities, locations, duration_days)
}

/// One independent planning request for [`RoutePlanner::plan_batch`].
#[derive(Debug, Clone)]
pub struct PlanRequest<A> {
    pub activities: Vec<A>,
    pub locations: Vec<Location>,
    pub duration_days: i32,
}

/// A planner with validated options and a travel-time provider.
///
/// Holds no state between calls; every plan is computed from scratch.
#[derive(Debug, Clone)]
pub struct RoutePlanner<M = HaversineMatrix> {
    options: PlannerOptions,
    matrix: M,
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self {
            options: PlannerOptions::default(),
            matrix: HaversineMatrix::default(),
        }
    }
}

impl RoutePlanner {
    /// Creates a planner whose haversine estimate uses the configured speed.
    pub fn new(options: PlannerOptions) -> Result<Self, ConfigError> {
        let matrix = HaversineMatrix::new(options.average_speed_kmh);
        Self::with_matrix(options, matrix)
    }
}

impl<M: DistanceMatrixProvider> RoutePlanner<M> {
    pub fn with_matrix(options: PlannerOptions, matrix: M) -> Result<Self, ConfigError> {
        options.validate()?;
        Ok(Self { options, matrix })
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    pub fn plan<A: Activity>(
        &self,
        activities: &[A],
        locations: &[Location],
        duration_days: i32,
    ) -> RoutePlanResult<A::Id> {
        self.plan_with_lodging(activities, locations, duration_days, &NoLodging)
    }

    /// Like [`RoutePlanner::plan`], labelling each night's sleep block with
    /// the lodging the provider names for it.
    pub fn plan_with_lodging<A, L>(
        &self,
        activities: &[A],
        locations: &[Location],
        duration_days: i32,
        lodging: &L,
    ) -> RoutePlanResult<A::Id>
    where
        A: Activity,
        L: LodgingProvider + ?Sized,
    {
        let options = &self.options;
        let requested_days = duration_days.max(1) as u32;

        let mut included: Vec<&A> = Vec::with_capacity(activities.len());
        let mut excluded = Vec::new();
        for activity in activities {
            if options.unlocated == UnlocatedPolicy::Exclude && activity.coordinates().is_none() {
                excluded.push(activity.id().clone());
            } else {
                included.push(activity);
            }
        }
        if !excluded.is_empty() {
            debug!(count = excluded.len(), "excluding activities without coordinates");
        }

        let table = TravelTable::build(locations, &included, &self.matrix, options);
        let buckets = allocate(&included, &table, requested_days, options);

        let plan: Vec<_> = buckets
            .iter()
            .zip(1..)
            .map(|(bucket, day_number)| schedule(bucket, day_number, &table, lodging, options))
            .collect();

        let breakdown = score_breakdown(&plan);
        let total_days = plan.len() as u32;
        info!(
            activities = included.len(),
            requested_days,
            total_days,
            score = breakdown.total(),
            "generated route plan"
        );

        RoutePlanResult {
            plan,
            total_days,
            requested_days,
            optimization_score: breakdown.total(),
            score_breakdown: breakdown,
            excluded,
        }
    }

    /// Plans independent requests in parallel.
    ///
    /// Results come back in request order.
    pub fn plan_batch<A>(&self, requests: &[PlanRequest<A>]) -> Vec<RoutePlanResult<A::Id>>
    where
        A: Activity + Sync,
        A::Id: Send,
        M: Sync,
    {
        requests
            .par_iter()
            .map(|request| self.plan(&request.activities, &request.locations, request.duration_days))
            .collect()
    }
}
