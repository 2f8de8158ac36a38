//! Square driving duration/distance table.

use serde::Deserialize;

use crate::error::ProviderError;

#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrix {
    /// Driving durations in seconds.
    durations: Vec<Vec<f64>>,
    /// Driving distances in meters.
    distances: Vec<Vec<f64>>,
}

impl TravelMatrix {
    /// Build a matrix from provider rows, rejecting ragged, empty or
    /// incomplete tables.
    pub fn new(
        durations: Vec<Vec<f64>>,
        distances: Vec<Vec<f64>>,
    ) -> Result<Self, ProviderError> {
        let n = durations.len();
        if n == 0 {
            return Err(ProviderError::MalformedMatrix("empty duration table".to_string()));
        }
        if distances.len() != n {
            return Err(ProviderError::MalformedMatrix(format!(
                "{} duration rows but {} distance rows",
                n,
                distances.len()
            )));
        }

        for (i, (duration_row, distance_row)) in durations.iter().zip(&distances).enumerate() {
            if duration_row.len() != n || distance_row.len() != n {
                return Err(ProviderError::MalformedMatrix(format!(
                    "row {} is not {} wide",
                    i, n
                )));
            }
            if duration_row
                .iter()
                .chain(distance_row)
                .any(|value| !value.is_finite() || *value < 0.0)
            {
                return Err(ProviderError::MalformedMatrix(format!(
                    "row {} has invalid entries",
                    i
                )));
            }
        }

        Ok(Self { durations, distances })
    }

    /// Build from provider rows where unreachable pairs come back as `null`.
    pub fn from_optional_rows(
        durations: Vec<Vec<Option<f64>>>,
        distances: Vec<Vec<Option<f64>>>,
    ) -> Result<Self, ProviderError> {
        let unwrap_rows = |rows: Vec<Vec<Option<f64>>>, what: &str| {
            rows.into_iter()
                .enumerate()
                .map(|(i, row)| {
                    row.into_iter()
                        .enumerate()
                        .map(|(j, value)| {
                            value.ok_or_else(|| {
                                ProviderError::MalformedMatrix(format!(
                                    "no {} between {} and {}",
                                    what, i, j
                                ))
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()
        };

        Self::new(unwrap_rows(durations, "route")?, unwrap_rows(distances, "distance")?)
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn duration_secs(&self, from: usize, to: usize) -> f64 {
        self.durations[from][to]
    }

    pub fn distance_meters(&self, from: usize, to: usize) -> f64 {
        self.distances[from][to]
    }

    /// Driving time rounded to whole minutes.
    pub fn minutes(&self, from: usize, to: usize) -> u32 {
        (self.durations[from][to] / 60.0).round() as u32
    }
}

/// Table body shared by OSRM `/table` and the Mapbox directions-matrix API.
///
/// Both answer with a `code` of `"Ok"` on success and `null` for pairs
/// that have no route.
#[derive(Debug, Deserialize)]
pub(crate) struct TableResponse {
    code: String,
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl TableResponse {
    pub(crate) fn into_matrix(self) -> Result<TravelMatrix, ProviderError> {
        if self.code != "Ok" {
            return Err(ProviderError::Api {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }

        match (self.durations, self.distances) {
            (Some(durations), Some(distances)) => {
                TravelMatrix::from_optional_rows(durations, distances)
            }
            _ => Err(ProviderError::MalformedMatrix(
                "response is missing durations or distances".to_string(),
            )),
        }
    }
}
