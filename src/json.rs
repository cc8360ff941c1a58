//! JSON boundary for problem input and solution output.
//!
//! Enabled by the `json` feature.

use serde::Deserialize;

use crate::error::ValidationError;
use crate::models::{Destination, Passenger, ProblemData, Solution, Vehicle};

#[derive(Deserialize)]
struct ProblemInput {
    passengers: Vec<Passenger>,
    vehicles: Vec<Vehicle>,
    destination: Destination,
}

/// Parses and validates `{ "passengers": [...], "vehicles": [...], "destination": {...} }`.
///
/// # Examples
///
/// ```
/// let json = r#"{
///     "passengers": [{"id": 1, "name": "Ada", "latitude": 0.0, "longitude": 1.0}],
///     "vehicles": [{"id": 0, "capacity": 2, "start_latitude": 0.0, "start_longitude": 0.0}],
///     "destination": {"latitude": 0.0, "longitude": 3.0, "target_time_minutes": 480}
/// }"#;
/// let problem = rideshare_ga::json::problem_from_json(json).unwrap();
/// assert_eq!(problem.num_passengers(), 1);
/// ```
pub fn problem_from_json(json: &str) -> Result<ProblemData, ValidationError> {
    let input: ProblemInput = serde_json::from_str(json)?;
    ProblemData::new(input.passengers, input.vehicles, input.destination)
}

/// Renders a solution, including each vehicle's pickup order and distance.
pub fn solution_to_json(solution: &Solution) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(solution)
}
