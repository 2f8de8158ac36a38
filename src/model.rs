//! Request and response types for route optimization.
//!
//! Field names follow the JSON contract of the optimize function (camelCase).

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::traits::Coordinates;

/// How badly the couple wants to visit a place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Always included.
    #[serde(alias = "must_go", alias = "mustGo")]
    MustGo,
    /// Included only when it is cheap to reach along the way.
    #[serde(alias = "chill")]
    Chill,
}

/// A candidate place to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub name: String,
    pub address: String,
    /// Display-only category tag ("restaurant", "park", ...).
    #[serde(rename = "type", default)]
    pub category: String,
    pub priority: Priority,
    /// Minutes spent on site.
    #[serde(rename = "estimatedDuration")]
    pub estimated_duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// Start or end of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    pub start_point: Endpoint,
    pub end_point: Endpoint,
    pub places: Vec<Stop>,
    /// Plan date, carried for display only.
    #[serde(default)]
    pub date: String,
}

/// One row of the final itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledActivity {
    pub order_index: usize,
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub category: String,
    /// `None` for meal placeholders, which have no fixed location.
    pub coordinates: Option<Coordinates>,
    pub activity_time: ClockTime,
    pub activity_end_time: ClockTime,
    #[serde(rename = "estimatedDuration")]
    pub estimated_duration_minutes: u32,
    pub travel_time_from_previous: u32,
    /// `None` for meal placeholders.
    pub priority: Option<Priority>,
    pub is_auto_scheduled: bool,
    pub description: String,
}

/// A chill stop that did not make the cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedStop {
    pub name: String,
    pub address: String,
    pub reason: String,
}

/// A place dropped because its address could not be geocoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedPlace {
    pub name: String,
    pub address: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    /// Kilometers, one decimal.
    pub total_distance: f64,
    pub total_travel_time: u32,
    pub total_activity_time: u32,
    pub estimated_end_time: ClockTime,
}

/// Output of one optimization call.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub route: Vec<ScheduledActivity>,
    pub skipped: Vec<SkippedStop>,
    pub unresolved: Vec<UnresolvedPlace>,
    pub summary: RouteSummary,
}

/// Wire response of the optimize function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_route: Option<Vec<ScheduledActivity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_places: Option<Vec<SkippedStop>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unresolved_places: Option<Vec<UnresolvedPlace>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<RouteSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OptimizeResponse {
    pub fn ok(plan: RoutePlan) -> Self {
        Self {
            success: true,
            optimized_route: Some(plan.route),
            skipped_places: Some(plan.skipped),
            unresolved_places: Some(plan.unresolved),
            summary: Some(plan.summary),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            optimized_route: None,
            skipped_places: None,
            unresolved_places: None,
            summary: None,
            error: Some(error.to_string()),
        }
    }
}
