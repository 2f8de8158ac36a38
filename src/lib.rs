//! date-planner core
//!
//! Date-route optimization and anniversary computation for couples.

pub mod anniversary;
pub mod api;
pub mod clock;
pub mod error;
pub mod haversine;
pub mod mapbox;
pub mod matrix;
pub mod model;
pub mod osrm;
pub mod solver;
pub mod traits;
