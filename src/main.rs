use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use date_planner::anniversary::{anniversaries_on, calculate_anniversaries};
use date_planner::api::optimize_json;
use date_planner::error::{ConfigError, ProviderError};
use date_planner::haversine::HaversineMatrix;
use date_planner::mapbox::{MapboxClient, MapboxConfig};
use date_planner::matrix::TravelMatrix;
use date_planner::model::OptimizeResponse;
use date_planner::osrm::{OsrmClient, OsrmConfig};
use date_planner::traits::{Coordinates, DistanceMatrixProvider, Geocoder, NoGeocoder};

/// Date planning tools: route optimization and anniversary dates.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Optimize a date route from a JSON request and print the JSON response.
    Optimize {
        /// Request file, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Travel matrix backend.
        #[arg(short, long, value_enum, default_value_t = MatrixBackend::Mapbox)]
        matrix: MatrixBackend,
    },
    /// Print anniversaries and milestones as JSON.
    Anniversaries {
        /// Date the couple first met (YYYY-MM-DD).
        #[arg(long)]
        met: NaiveDate,

        /// Date the couple got together (YYYY-MM-DD).
        #[arg(long)]
        together: NaiveDate,

        /// Evaluate as of this day instead of now.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MatrixBackend {
    Mapbox,
    Osrm,
    Haversine,
}

enum GeocoderChoice {
    Mapbox(MapboxClient),
    Disabled(NoGeocoder),
}

impl Geocoder for GeocoderChoice {
    fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        match self {
            GeocoderChoice::Mapbox(client) => client.geocode(address),
            GeocoderChoice::Disabled(none) => none.geocode(address),
        }
    }
}

enum MatrixChoice {
    Mapbox(MapboxClient),
    Osrm(OsrmClient),
    Haversine(HaversineMatrix),
}

impl DistanceMatrixProvider for MatrixChoice {
    fn matrix_for(&self, locations: &[Coordinates]) -> Result<TravelMatrix, ProviderError> {
        match self {
            MatrixChoice::Mapbox(client) => client.matrix_for(locations),
            MatrixChoice::Osrm(client) => client.matrix_for(locations),
            MatrixChoice::Haversine(haversine) => haversine.matrix_for(locations),
        }
    }
}

fn main() -> ExitCode {
    dotenvy::from_filename("./.env.local").ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Optimize { input, matrix } => run_optimize(&input, matrix),
        Command::Anniversaries { met, together, today } => {
            let entries = match today {
                Some(today) => anniversaries_on(met, together, today),
                None => calculate_anniversaries(met, together, Utc::now()),
            };
            print_json(&entries)
        }
    }
}

fn run_optimize(input: &str, backend: MatrixBackend) -> ExitCode {
    let body = match read_input(input) {
        Ok(body) => body,
        Err(err) => {
            error!(input, error = %err, "failed to read request");
            return print_response(OptimizeResponse::failed(format!(
                "failed to read request: {}",
                err
            )));
        }
    };

    let (geocoder, matrix) = match build_providers(backend) {
        Ok(providers) => providers,
        Err(err) => {
            error!(error = %err, "provider configuration failed");
            return print_response(OptimizeResponse::failed(err));
        }
    };

    info!(backend = ?backend, "optimizing route");
    print_response(optimize_json(&body, &geocoder, &matrix))
}

fn build_providers(backend: MatrixBackend) -> Result<(GeocoderChoice, MatrixChoice), ConfigError> {
    let mapbox = match MapboxConfig::from_env() {
        Ok(config) => Some(MapboxClient::new(config)?),
        Err(err) if backend == MatrixBackend::Mapbox => return Err(err),
        Err(_) => None,
    };

    let geocoder = match &mapbox {
        Some(client) => GeocoderChoice::Mapbox(client.clone()),
        None => GeocoderChoice::Disabled(NoGeocoder),
    };

    let matrix = match (backend, mapbox) {
        (MatrixBackend::Mapbox, Some(client)) => MatrixChoice::Mapbox(client),
        (MatrixBackend::Mapbox, None) => {
            return Err(ConfigError::MissingAccessToken(date_planner::mapbox::ACCESS_TOKEN_ENV));
        }
        (MatrixBackend::Osrm, _) => MatrixChoice::Osrm(OsrmClient::new(OsrmConfig::from_env())?),
        (MatrixBackend::Haversine, _) => MatrixChoice::Haversine(HaversineMatrix::default()),
    };

    Ok((geocoder, matrix))
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        std::fs::read_to_string(PathBuf::from(input))
    }
}

fn print_response(response: OptimizeResponse) -> ExitCode {
    let success = response.success;
    let code = print_json(&response);
    if success { code } else { ExitCode::FAILURE }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "failed to serialize output");
            ExitCode::FAILURE
        }
    }
}
