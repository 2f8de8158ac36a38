//! Provider seams for the route optimizer.
//!
//! Geocoding and travel matrices come from external services. The optimizer
//! only talks to these traits so tests and offline runs can swap them out.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::matrix::TravelMatrix;

/// A resolved WGS84 location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Resolves a free-text address to coordinates.
///
/// Implementations must be shareable across threads; unresolved stops are
/// geocoded in parallel.
pub trait Geocoder: Sync {
    fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError>;
}

/// Provides a driving duration/distance matrix for a set of locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[Coordinates]) -> Result<TravelMatrix, ProviderError>;
}

/// Geocoder used when no backend is configured.
///
/// Every lookup fails, so only places that already carry coordinates survive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeocoder;

impl Geocoder for NoGeocoder {
    fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        Err(ProviderError::NotFound(address.to_string()))
    }
}
