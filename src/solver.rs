//! Date-route optimizer.
//!
//! Must-go stops are sequenced with a nearest-neighbour heuristic starting at
//! the start point. This is a greedy approximation, not an optimal tour; it is
//! good enough for the handful of stops in a date plan and fully
//! deterministic. Chill stops are then spliced in at their cheapest position
//! when the detour stays under a threshold, and meal placeholders are added
//! wherever a travel gap runs into a meal window.
//!
//! All planning happens on an arena of located nodes laid out as
//! `[start, must-go..., chill..., end]`. A node's arena index is also its
//! travel-matrix index, and the itinerary is an ordered list of those indices.

use std::ops::Range;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::clock::ClockTime;
use crate::error::{PlanError, ProviderError};
use crate::matrix::TravelMatrix;
use crate::model::{
    Endpoint, Priority, RoutePlan, RouteRequest, RouteSummary, ScheduledActivity, SkippedStop, Stop,
    UnresolvedPlace,
};
use crate::traits::{Coordinates, DistanceMatrixProvider, Geocoder};

/// Chill stops costing this many extra minutes or more are skipped.
pub const DEFAULT_DETOUR_THRESHOLD_MINUTES: u32 = 20;

/// Longest stay accepted for a single place.
pub const MAX_STOP_MINUTES: u32 = 24 * 60;

const START: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealKind {
    Lunch,
    Dinner,
}

impl MealKind {
    fn title(self) -> &'static str {
        match self {
            MealKind::Lunch => "Lunch time",
            MealKind::Dinner => "Dinner time",
        }
    }

    fn description(self) -> &'static str {
        match self {
            MealKind::Lunch => "Lunch break, pick somewhere to eat along the way",
            MealKind::Dinner => "Dinner break, pick somewhere to eat along the way",
        }
    }
}

/// A clock interval during which a meal placeholder is scheduled.
#[derive(Debug, Clone)]
pub struct MealWindow {
    pub kind: MealKind,
    pub start: ClockTime,
    pub end: ClockTime,
    pub duration_minutes: u32,
}

impl MealWindow {
    /// Whether the gap `[from, to]` between two stops runs into this window.
    fn is_crossed(&self, from: ClockTime, to: ClockTime) -> bool {
        from < self.end && to > self.start
    }
}

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Maximum extra driving (minutes, exclusive) for a chill stop to be kept.
    pub detour_threshold_minutes: u32,
    /// Meal windows, each served at most once per itinerary.
    pub meal_windows: Vec<MealWindow>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            detour_threshold_minutes: DEFAULT_DETOUR_THRESHOLD_MINUTES,
            meal_windows: vec![
                MealWindow {
                    kind: MealKind::Lunch,
                    start: ClockTime::hm(12, 0),
                    end: ClockTime::hm(13, 0),
                    duration_minutes: 60,
                },
                MealWindow {
                    kind: MealKind::Dinner,
                    start: ClockTime::hm(17, 30),
                    end: ClockTime::hm(19, 0),
                    duration_minutes: 60,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum NodeKind<'a> {
    Start,
    End,
    Stop(&'a Stop),
}

#[derive(Debug, Clone, Copy)]
struct Node<'a> {
    location: Coordinates,
    kind: NodeKind<'a>,
}

/// Plan a date itinerary.
///
/// Places without coordinates are geocoded first. Places that cannot be
/// located are left out of both the route and the skip list and reported in
/// [`RoutePlan::unresolved`]. Provider failures for the start/end points or
/// the travel matrix abort the call; nothing is retried.
pub fn optimize_route<G, M>(
    request: &RouteRequest,
    geocoder: &G,
    matrix_provider: &M,
    options: &SolveOptions,
) -> Result<RoutePlan, PlanError>
where
    G: Geocoder,
    M: DistanceMatrixProvider,
{
    let start_time = validate(request)?;

    let start = resolve_endpoint("start", &request.start_point, geocoder)?;
    let end = resolve_endpoint("end", &request.end_point, geocoder)?;

    // Collect keeps input order, so parallel lookups stay deterministic.
    let resolved: Vec<Option<Coordinates>> = request
        .places
        .par_iter()
        .map(|stop| resolve_stop(stop, geocoder))
        .collect();

    let mut must_go: Vec<Node<'_>> = Vec::new();
    let mut chill: Vec<Node<'_>> = Vec::new();
    let mut unresolved = Vec::new();

    for (stop, location) in request.places.iter().zip(resolved) {
        let Some(location) = location else {
            unresolved.push(UnresolvedPlace {
                name: stop.name.clone(),
                address: stop.address.clone(),
                priority: stop.priority,
            });
            continue;
        };

        let node = Node {
            location,
            kind: NodeKind::Stop(stop),
        };
        match stop.priority {
            Priority::MustGo => must_go.push(node),
            Priority::Chill => chill.push(node),
        }
    }

    if must_go.is_empty() && chill.is_empty() {
        return Err(PlanError::NoResolvedPlaces);
    }
    if must_go.is_empty() {
        warn!("no must-go place could be located; planning chill stops only");
    }

    let must_go_range = 1..1 + must_go.len();
    let chill_range = must_go_range.end..must_go_range.end + chill.len();

    let mut nodes = Vec::with_capacity(must_go.len() + chill.len() + 2);
    nodes.push(Node {
        location: start,
        kind: NodeKind::Start,
    });
    nodes.extend(must_go);
    nodes.extend(chill);
    nodes.push(Node {
        location: end,
        kind: NodeKind::End,
    });
    let end_index = nodes.len() - 1;

    let locations: Vec<Coordinates> = nodes.iter().map(|node| node.location).collect();
    let matrix = matrix_provider
        .matrix_for(&locations)
        .map_err(PlanError::NoViableMatrix)?;
    if matrix.len() != nodes.len() {
        return Err(PlanError::NoViableMatrix(ProviderError::MalformedMatrix(format!(
            "expected {} locations, got {}",
            nodes.len(),
            matrix.len()
        ))));
    }

    let mut sequence = Vec::with_capacity(nodes.len());
    sequence.push(START);
    sequence.extend(nearest_neighbor_order(&matrix, START, must_go_range));
    sequence.push(end_index);

    let mut detours: Vec<Option<u32>> = vec![None; nodes.len()];
    let mut skipped = Vec::new();
    let threshold_secs = f64::from(options.detour_threshold_minutes) * 60.0;

    for chill_index in chill_range {
        let Some((position, detour_secs)) = cheapest_insertion(&matrix, &sequence, chill_index)
        else {
            continue;
        };
        let detour_minutes = (detour_secs.max(0.0) / 60.0).round() as u32;

        if detour_secs < threshold_secs {
            debug!(node = chill_index, position, detour_minutes, "inserting chill stop");
            sequence.insert(position, chill_index);
            detours[chill_index] = Some(detour_minutes);
        } else if let NodeKind::Stop(stop) = nodes[chill_index].kind {
            debug!(name = %stop.name, detour_minutes, "skipping chill stop");
            skipped.push(SkippedStop {
                name: stop.name.clone(),
                address: stop.address.clone(),
                reason: format!(
                    "not on the way, would add approximately {} minutes",
                    detour_minutes
                ),
            });
        }
    }

    let (route, summary) = schedule(&nodes, &matrix, &sequence, &detours, start_time, options);

    if let Some(deadline) = request.end_point.time {
        if summary.estimated_end_time > deadline {
            warn!(
                estimated_end = %summary.estimated_end_time,
                requested_end = %deadline,
                "itinerary runs past the requested end time"
            );
        }
    }

    info!(
        activities = route.len(),
        skipped = skipped.len(),
        unresolved = unresolved.len(),
        total_distance_km = summary.total_distance,
        "route optimized"
    );

    Ok(RoutePlan {
        route,
        skipped,
        unresolved,
        summary,
    })
}

fn validate(request: &RouteRequest) -> Result<ClockTime, PlanError> {
    if request.places.is_empty() {
        return Err(PlanError::EmptyPlaces);
    }

    for stop in &request.places {
        if stop.estimated_duration_minutes == 0 {
            return Err(PlanError::InvalidRequest(format!(
                "place '{}' needs a positive estimated duration",
                stop.name
            )));
        }
        if stop.estimated_duration_minutes > MAX_STOP_MINUTES {
            return Err(PlanError::InvalidRequest(format!(
                "place '{}' lasts {} minutes, more than the {} allowed",
                stop.name, stop.estimated_duration_minutes, MAX_STOP_MINUTES
            )));
        }
    }

    request
        .start_point
        .time
        .ok_or_else(|| PlanError::InvalidRequest("start point needs a time".to_string()))
}

fn resolve_endpoint<G: Geocoder>(
    which: &'static str,
    endpoint: &Endpoint,
    geocoder: &G,
) -> Result<Coordinates, PlanError> {
    if let Some(location) = endpoint.coordinates {
        return Ok(location);
    }

    geocoder
        .geocode(&endpoint.address)
        .map_err(|source| PlanError::EndpointUnresolved {
            which,
            address: endpoint.address.clone(),
            source,
        })
}

fn resolve_stop<G: Geocoder>(stop: &Stop, geocoder: &G) -> Option<Coordinates> {
    if let Some(location) = stop.coordinates {
        return Some(location);
    }

    match geocoder.geocode(&stop.address) {
        Ok(location) => Some(location),
        Err(err) => {
            warn!(
                name = %stop.name,
                address = %stop.address,
                error = %err,
                "dropping place that could not be located"
            );
            None
        }
    }
}

/// Visit order for `candidates`, always moving to the closest unvisited one.
///
/// Ties go to the lowest index.
fn nearest_neighbor_order(
    matrix: &TravelMatrix,
    from: usize,
    candidates: Range<usize>,
) -> Vec<usize> {
    let mut remaining: Vec<usize> = candidates.collect();
    let mut order = Vec::with_capacity(remaining.len());
    let mut current = from;

    while let Some((position, next)) = remaining
        .iter()
        .copied()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            matrix
                .duration_secs(current, *a)
                .total_cmp(&matrix.duration_secs(current, *b))
        })
    {
        remaining.remove(position);
        order.push(next);
        current = next;
    }

    order
}

/// Cheapest place to splice `node` into `sequence`.
///
/// Returns the insertion index and the extra driving seconds it costs. The
/// first position wins ties.
fn cheapest_insertion(
    matrix: &TravelMatrix,
    sequence: &[usize],
    node: usize,
) -> Option<(usize, f64)> {
    sequence
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let (prev, next) = (pair[0], pair[1]);
            let detour = matrix.duration_secs(prev, node) + matrix.duration_secs(node, next)
                - matrix.duration_secs(prev, next);
            (i + 1, detour)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Walk the itinerary and assign clock times, adding meal placeholders.
fn schedule(
    nodes: &[Node<'_>],
    matrix: &TravelMatrix,
    sequence: &[usize],
    detours: &[Option<u32>],
    start_time: ClockTime,
    options: &SolveOptions,
) -> (Vec<ScheduledActivity>, RouteSummary) {
    let mut pending_meals: Vec<&MealWindow> = options.meal_windows.iter().collect();
    pending_meals.sort_by_key(|window| window.start);

    let mut route: Vec<ScheduledActivity> = Vec::new();
    let mut clock = start_time;
    let mut distance_meters = 0.0;
    let mut travel_minutes = 0;
    let mut activity_minutes = 0;

    for pair in sequence.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let travel = matrix.minutes(from, to);
        distance_meters += matrix.distance_meters(from, to);

        // The drive to the end point has no row of its own; it moves the
        // clock and the distance but not the driving total.
        let NodeKind::Stop(stop) = nodes[to].kind else {
            clock = clock + travel;
            continue;
        };
        travel_minutes += travel;

        let mut i = 0;
        while i < pending_meals.len() {
            let window = pending_meals[i];
            if !window.is_crossed(clock, clock + travel) {
                i += 1;
                continue;
            }

            let begins = clock.max(window.start);
            let ends = begins + window.duration_minutes;
            debug!(meal = ?window.kind, at = %begins, "inserting meal placeholder");
            route.push(ScheduledActivity {
                order_index: route.len(),
                name: window.kind.title().to_string(),
                address: String::new(),
                category: "meal".to_string(),
                coordinates: None,
                activity_time: begins,
                activity_end_time: ends,
                estimated_duration_minutes: window.duration_minutes,
                travel_time_from_previous: 0,
                priority: None,
                is_auto_scheduled: true,
                description: window.kind.description().to_string(),
            });
            activity_minutes += window.duration_minutes;
            clock = ends;
            pending_meals.remove(i);
        }

        let arrival = clock + travel;
        let departure = arrival + stop.estimated_duration_minutes;
        let description = match detours[to] {
            Some(minutes) => format!("On the way, adds about {} minutes of driving", minutes),
            None => "Must-go stop".to_string(),
        };

        route.push(ScheduledActivity {
            order_index: route.len(),
            name: stop.name.clone(),
            address: stop.address.clone(),
            category: stop.category.clone(),
            coordinates: Some(nodes[to].location),
            activity_time: arrival,
            activity_end_time: departure,
            estimated_duration_minutes: stop.estimated_duration_minutes,
            travel_time_from_previous: travel,
            priority: Some(stop.priority),
            is_auto_scheduled: stop.priority == Priority::Chill,
            description,
        });
        activity_minutes += stop.estimated_duration_minutes;
        clock = departure;
    }

    let summary = RouteSummary {
        total_distance: (distance_meters / 100.0).round() / 10.0,
        total_travel_time: travel_minutes,
        total_activity_time: activity_minutes,
        estimated_end_time: clock,
    };

    (route, summary)
}
