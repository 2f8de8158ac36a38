//! Test fixtures for date-planner.
//!
//! Provides:
//! - A table-driven travel matrix keyed by point ids (minutes per edge)
//! - A lookup geocoder with a fixed address book
//! - Builders for stops and route requests

#![allow(dead_code)]

use std::collections::HashMap;

use date_planner::clock::ClockTime;
use date_planner::error::ProviderError;
use date_planner::matrix::TravelMatrix;
use date_planner::model::{Endpoint, Priority, RouteRequest, Stop};
use date_planner::traits::{Coordinates, DistanceMatrixProvider, Geocoder};

pub const START: u32 = 0;
pub const END: u32 = 99;

/// Meters driven per minute in fixture matrices (30 km/h).
pub const METERS_PER_MINUTE: f64 = 500.0;

/// Fixture points live on the equator; the longitude is the point id.
pub fn point(id: u32) -> Coordinates {
    Coordinates::new(0.0, f64::from(id))
}

fn point_id(location: &Coordinates) -> u32 {
    location.lng.round() as u32
}

/// Symmetric minute table; unlisted pairs cost `fallback` minutes.
#[derive(Debug, Clone)]
pub struct TableMatrix {
    minutes: HashMap<(u32, u32), u32>,
    fallback: u32,
}

impl TableMatrix {
    pub fn new(fallback: u32) -> Self {
        Self {
            minutes: HashMap::new(),
            fallback,
        }
    }

    pub fn edge(mut self, a: u32, b: u32, minutes: u32) -> Self {
        self.minutes.insert((a, b), minutes);
        self.minutes.insert((b, a), minutes);
        self
    }

    fn lookup(&self, from: u32, to: u32) -> u32 {
        if from == to {
            return 0;
        }
        self.minutes.get(&(from, to)).copied().unwrap_or(self.fallback)
    }
}

impl DistanceMatrixProvider for TableMatrix {
    fn matrix_for(&self, locations: &[Coordinates]) -> Result<TravelMatrix, ProviderError> {
        let ids: Vec<u32> = locations.iter().map(point_id).collect();
        let minutes: Vec<Vec<f64>> = ids
            .iter()
            .map(|from| ids.iter().map(|to| f64::from(self.lookup(*from, *to))).collect())
            .collect();

        let durations = minutes
            .iter()
            .map(|row| row.iter().map(|m| m * 60.0).collect())
            .collect();
        let distances = minutes
            .iter()
            .map(|row| row.iter().map(|m| m * METERS_PER_MINUTE).collect())
            .collect();

        TravelMatrix::new(durations, distances)
    }
}

/// Matrix provider that always fails.
pub struct FailingMatrix;

impl DistanceMatrixProvider for FailingMatrix {
    fn matrix_for(&self, _locations: &[Coordinates]) -> Result<TravelMatrix, ProviderError> {
        Err(ProviderError::Api {
            code: "503".to_string(),
            message: "service unavailable".to_string(),
        })
    }
}

/// Matrix provider that ignores its input and returns a 2x2 table.
pub struct UndersizedMatrix;

impl DistanceMatrixProvider for UndersizedMatrix {
    fn matrix_for(&self, _locations: &[Coordinates]) -> Result<TravelMatrix, ProviderError> {
        TravelMatrix::new(
            vec![vec![0.0, 60.0], vec![60.0, 0.0]],
            vec![vec![0.0, 1.0], vec![1.0, 0.0]],
        )
    }
}

/// Geocoder backed by a fixed address book.
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    entries: HashMap<String, Coordinates>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: &str, id: u32) -> Self {
        self.entries.insert(address.to_string(), point(id));
        self
    }
}

impl Geocoder for AddressBook {
    fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        self.entries
            .get(address)
            .copied()
            .ok_or_else(|| ProviderError::NotFound(address.to_string()))
    }
}

pub fn stop(name: &str, id: u32, priority: Priority, duration: u32) -> Stop {
    Stop {
        name: name.to_string(),
        address: format!("{} Road", name),
        category: "spot".to_string(),
        priority,
        estimated_duration_minutes: duration,
        coordinates: Some(point(id)),
    }
}

pub fn must_go(name: &str, id: u32, duration: u32) -> Stop {
    stop(name, id, Priority::MustGo, duration)
}

pub fn chill(name: &str, id: u32, duration: u32) -> Stop {
    stop(name, id, Priority::Chill, duration)
}

/// A stop without coordinates, to be resolved through the geocoder.
pub fn unlocated(name: &str, address: &str, priority: Priority) -> Stop {
    Stop {
        name: name.to_string(),
        address: address.to_string(),
        category: "spot".to_string(),
        priority,
        estimated_duration_minutes: 30,
        coordinates: None,
    }
}

/// Request leaving `START` at 09:00 and finishing at `END`.
pub fn request(places: Vec<Stop>) -> RouteRequest {
    RouteRequest {
        start_point: Endpoint {
            address: "Home".to_string(),
            time: Some(ClockTime::hm(9, 0)),
            coordinates: Some(point(START)),
        },
        end_point: Endpoint {
            address: "Home again".to_string(),
            time: Some(ClockTime::hm(22, 0)),
            coordinates: Some(point(END)),
        },
        places,
        date: "2024-05-20".to_string(),
    }
}
