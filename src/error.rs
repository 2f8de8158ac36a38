use thiserror::Error;

/// Missing or unusable provider configuration. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing provider access token: set {0}")]
    MissingAccessToken(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure talking to a geocoding or distance-matrix provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {code} - {message}")]
    Api { code: String, message: String },

    #[error("invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("no location found for address: {0}")]
    NotFound(String),

    #[error("too many locations for one matrix request: {got} (max {max})")]
    TooManyLocations { got: usize, max: usize },

    #[error("malformed travel matrix: {0}")]
    MalformedMatrix(String),
}

/// Errors that abort a route optimization call.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request contains no places")]
    EmptyPlaces,

    #[error("could not resolve {which} point '{address}': {source}")]
    EndpointUnresolved {
        which: &'static str,
        address: String,
        #[source]
        source: ProviderError,
    },

    #[error("none of the requested places could be located")]
    NoResolvedPlaces,

    #[error("no viable travel matrix: {0}")]
    NoViableMatrix(#[source] ProviderError),
}
