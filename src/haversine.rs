//! Haversine travel matrix provider (offline fallback).
//!
//! Uses great-circle distance with a road-detour factor to estimate driving
//! distance and time. Less accurate than a routing service (ignores roads) but
//! always available.

use crate::error::ProviderError;
use crate::matrix::TravelMatrix;
use crate::traits::{Coordinates, DistanceMatrixProvider};

/// Average city driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 30.0;

/// Roads are rarely straight; scale straight-line distance by this.
const DEFAULT_ROAD_FACTOR: f64 = 1.3;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
    /// Multiplier from straight-line to road distance.
    pub road_factor: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            road_factor: DEFAULT_ROAD_FACTOR,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            ..Self::default()
        }
    }

    /// Great-circle distance between two points in kilometers.
    fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
        let lat1_rad = from.lat.to_radians();
        let lat2_rad = to.lat.to_radians();
        let delta_lat = (to.lat - from.lat).to_radians();
        let delta_lng = (to.lng - from.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_seconds(&self, km: f64) -> f64 {
        (km / self.speed_kmh * 3600.0).round()
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[Coordinates]) -> Result<TravelMatrix, ProviderError> {
        if self.speed_kmh <= 0.0 {
            return Err(ProviderError::MalformedMatrix(format!(
                "speed must be positive, got {}",
                self.speed_kmh
            )));
        }

        let n = locations.len();
        let mut durations = vec![vec![0.0; n]; n];
        let mut distances = vec![vec![0.0; n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    let km = Self::haversine_km(*from, *to) * self.road_factor;
                    distances[i][j] = (km * 1000.0).round();
                    durations[i][j] = self.km_to_seconds(km);
                }
            }
        }

        TravelMatrix::new(durations, distances)
    }
}
