//! JSON boundary of the optimize function.
//!
//! Every failure is folded into `{ "success": false, "error": ... }`; the
//! caller never sees a partial plan.

use tracing::error;

use crate::error::PlanError;
use crate::model::{OptimizeResponse, RoutePlan, RouteRequest};
use crate::solver::{optimize_route, SolveOptions};
use crate::traits::{DistanceMatrixProvider, Geocoder};

/// Parse a request body, optimize it and build the wire response.
pub fn optimize_json<G, M>(body: &str, geocoder: &G, matrix_provider: &M) -> OptimizeResponse
where
    G: Geocoder,
    M: DistanceMatrixProvider,
{
    let request: RouteRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(err) => {
            let err = PlanError::InvalidRequest(err.to_string());
            error!(error = %err, "rejecting route request");
            return OptimizeResponse::failed(err);
        }
    };

    respond(optimize_route(&request, geocoder, matrix_provider, &SolveOptions::default()))
}

/// Turn an optimization result into the wire response, logging failures.
pub fn respond(result: Result<RoutePlan, PlanError>) -> OptimizeResponse {
    match result {
        Ok(plan) => OptimizeResponse::ok(plan),
        Err(err) => {
            error!(error = %err, "route optimization failed");
            OptimizeResponse::failed(err)
        }
    }
}
