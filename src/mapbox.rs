//! Mapbox adapter: forward geocoding and driving travel matrices.
//!
//! Both endpoints are keyed by a single access token. Request URLs carry the
//! token, so transport errors are stripped of their URL before surfacing.

use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ConfigError, ProviderError};
use crate::matrix::{TableResponse, TravelMatrix};
use crate::traits::{Coordinates, DistanceMatrixProvider, Geocoder};

pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";
pub const BASE_URL_ENV: &str = "MAPBOX_BASE_URL";

/// Coordinate limit of the directions-matrix API for driving profiles.
pub const MAX_MATRIX_LOCATIONS: usize = 25;

#[derive(Debug, Clone)]
pub struct MapboxConfig {
    pub access_token: String,
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl MapboxConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: "https://api.mapbox.com".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }

    /// Read the token (and optional base URL) from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingAccessToken(ACCESS_TOKEN_ENV))?;

        let mut config = Self::new(token);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct MapboxClient {
    config: MapboxConfig,
    client: reqwest::blocking::Client,
}

impl MapboxClient {
    pub fn new(config: MapboxConfig) -> Result<Self, ConfigError> {
        if config.access_token.trim().is_empty() {
            return Err(ConfigError::MissingAccessToken(ACCESS_TOKEN_ENV));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&self.config.base_url).map_err(|err| {
            ProviderError::InvalidUrl(format!("{}: {}", self.config.base_url, err))
        })?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("access_token", &self.config.access_token);
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ProviderError> {
        let response = self.client.get(url).send().map_err(|err| err.without_url())?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<MapboxErrorBody>()
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_default();
            return Err(ProviderError::Api {
                code: status.as_u16().to_string(),
                message,
            });
        }

        response.json::<T>().map_err(|err| err.without_url().into())
    }
}

impl Geocoder for MapboxClient {
    fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        if address.trim().is_empty() {
            return Err(ProviderError::NotFound(address.to_string()));
        }

        let query = format!("{}.json", address.trim());
        let mut url = self.endpoint(&["geocoding", "v5", "mapbox.places", query.as_str()])?;
        url.query_pairs_mut().append_pair("limit", "1");

        let body: GeocodingResponse = self.get_json(url)?;
        let location = body
            .first_center()
            .ok_or_else(|| ProviderError::NotFound(address.to_string()))?;
        debug!(address, lat = location.lat, lng = location.lng, "geocoded address");
        Ok(location)
    }
}

impl DistanceMatrixProvider for MapboxClient {
    fn matrix_for(&self, locations: &[Coordinates]) -> Result<TravelMatrix, ProviderError> {
        if locations.is_empty() {
            return Err(ProviderError::MalformedMatrix("no locations".to_string()));
        }
        if locations.len() > MAX_MATRIX_LOCATIONS {
            return Err(ProviderError::TooManyLocations {
                got: locations.len(),
                max: MAX_MATRIX_LOCATIONS,
            });
        }

        let coords = locations
            .iter()
            .map(|location| format!("{:.6},{:.6}", location.lng, location.lat))
            .collect::<Vec<_>>()
            .join(";");

        let mut url = self.endpoint(&[
            "directions-matrix",
            "v1",
            "mapbox",
            self.config.profile.as_str(),
            coords.as_str(),
        ])?;
        url.query_pairs_mut()
            .append_pair("annotations", "duration,distance");

        let body: TableResponse = self.get_json(url)?;
        debug!(locations = locations.len(), "fetched travel matrix");
        body.into_matrix()
    }
}

#[derive(Debug, Deserialize)]
struct MapboxErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    features: Vec<GeocodingFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodingFeature {
    /// `[lng, lat]`
    center: [f64; 2],
}

impl GeocodingResponse {
    fn first_center(&self) -> Option<Coordinates> {
        self.features
            .first()
            .map(|feature| Coordinates::new(feature.center[1], feature.center[0]))
    }
}
